//! Error types for og-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for og-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for og-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL does not follow the storage addressing convention
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Listing or read failure from the storage backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// Object or container does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local filesystem create/remove/write failure
    #[error("Local IO error: {0}")]
    LocalIo(String),

    /// Invocation aborted via cancellation signal or timeout
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidLocation(_) => 2, // UsageError
            Error::Config(_) => 2,          // UsageError
            Error::InvalidUrl(_) => 2,      // UsageError
            Error::Backend(_) => 3,         // NetworkError
            Error::NotFound(_) => 5,        // NotFound
            Error::Cancelled => 130,        // Interrupted
            _ => 1,                         // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidLocation("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Backend("test".into()).exit_code(), 3);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Cancelled.exit_code(), 130);
        assert_eq!(Error::LocalIo("test".into()).exit_code(), 1);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidLocation("https://example.com/x".into());
        assert_eq!(err.to_string(), "Invalid location: https://example.com/x");

        let err = Error::NotFound("bucket/key".into());
        assert_eq!(err.to_string(), "Not found: bucket/key");

        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }
}
