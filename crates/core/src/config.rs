//! Configuration management
//!
//! Loads and saves the oget configuration file, stored in TOML format at
//! `<config_dir>/oget/config.toml`. The directory can be overridden with the
//! `OGET_CONFIG_DIR` environment variable; credentials can be overridden with
//! `OGET_ACCESS_KEY` / `OGET_SECRET_KEY`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Default storage endpoint (the provider's S3-interoperability API)
pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";

/// Default region
const DEFAULT_REGION: &str = "auto";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Storage endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Region passed to the SDK
    #[serde(default = "default_region")]
    pub region: String,

    /// HMAC access key ID
    #[serde(default)]
    pub access_key: String,

    /// HMAC secret access key
    #[serde(default)]
    pub secret_key: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            endpoint: default_endpoint(),
            region: default_region(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

impl Config {
    /// Apply credential overrides from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OGET_ACCESS_KEY") {
            self.access_key = key;
        }
        if let Ok(key) = std::env::var("OGET_SECRET_KEY") {
            self.secret_key = key;
        }
        if let Ok(endpoint) = std::env::var("OGET_ENDPOINT") {
            self.endpoint = endpoint;
        }
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os("OGET_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("oget"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// A missing file yields the default configuration. An older schema
    /// version is migrated; a newer one is rejected. Environment overrides
    /// are not applied here; callers that want them use
    /// [`Config::apply_env_overrides`] so that `config set` never persists
    /// environment-provided credentials.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade oget.",
                config.schema_version, SCHEMA_VERSION
            )));
        }
        self.migrate(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema versions
    fn migrate(&self, config: Config) -> Result<Config> {
        let mut config = config;

        // Migration steps land here when the schema version is bumped.

        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
