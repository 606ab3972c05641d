//! ObjectReader trait definition
//!
//! This trait is the boundary between the fetcher and the storage backend.
//! The backend exposes exactly two capabilities: listing objects under a key
//! prefix and opening a readable byte stream for one object. Keeping the
//! boundary this narrow allows the fetcher to be tested against an in-memory
//! implementation and decouples it from any specific SDK.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::error::Result;

/// A readable byte stream for a single object
pub type ObjectStream = Box<dyn AsyncRead + Send + Unpin>;

/// One object yielded by a prefix listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Full object key
    pub key: String,

    /// Size in bytes, when the backend reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,

    /// Human-readable size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<jiff::Timestamp>,
}

impl ObjectDescriptor {
    /// Create a descriptor with a known size
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size as u64, humansize::BINARY)),
            last_modified: None,
        }
    }

    /// Create a descriptor without size information
    pub fn unsized_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
        }
    }

    /// Whether this entry is a zero-length directory placeholder
    pub fn is_placeholder(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// One page of a prefix listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPage {
    /// Objects whose keys start with the queried prefix, in backend order
    pub objects: Vec<ObjectDescriptor>,

    /// Whether more pages are available
    pub truncated: bool,

    /// Continuation token for the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
}

/// Options for list operations
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Maximum number of keys to return in this page
    pub max_keys: Option<i32>,

    /// Continuation token from a previous page
    pub continuation_token: Option<String>,
}

/// Read-only access to an object-storage backend
///
/// Both operations are non-mutating, so one client may be shared across
/// concurrent fetch invocations.
#[async_trait]
pub trait ObjectReader: Send + Sync {
    /// List objects whose key starts with `prefix`, one page at a time
    async fn list(&self, container: &str, prefix: &str, options: ListOptions) -> Result<ListPage>;

    /// Open a readable byte stream for a single object
    async fn open_read(&self, container: &str, key: &str) -> Result<ObjectStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_with_size() {
        let desc = ObjectDescriptor::new("a/b.txt", 2048);
        assert_eq!(desc.key, "a/b.txt");
        assert_eq!(desc.size_bytes, Some(2048));
        assert_eq!(desc.size_human.as_deref(), Some("2 KiB"));
        assert!(!desc.is_placeholder());
    }

    #[test]
    fn test_descriptor_placeholder() {
        let desc = ObjectDescriptor::new("a/sub/", 0);
        assert!(desc.is_placeholder());
    }

    #[test]
    fn test_descriptor_unsized() {
        let desc = ObjectDescriptor::unsized_key("k");
        assert!(desc.size_bytes.is_none());
        assert!(desc.size_human.is_none());
    }
}
