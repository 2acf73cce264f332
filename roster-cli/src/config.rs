//! Configuration loading for roster.
//!
//! Configuration is loaded from a TOML file (default: `roster.toml` in the
//! data directory). A missing file means defaults.

use roster_client::{HttpConfig, DEFAULT_BASE_URL};
use roster_core::DEFAULT_BACKFILL_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "roster.toml";

/// Root configuration for roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Listing configuration.
    #[serde(default)]
    pub list: ListConfig,
}

/// Directory API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the directory API (default: https://reqres.in/api).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value sent as `x-api-key` (optional).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Load the next page after a delete leaves fewer users than this on the
    /// first page (default: 6, 0 disables).
    #[serde(default = "default_backfill_threshold")]
    pub backfill_threshold: usize,
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_backfill_threshold() -> usize {
    DEFAULT_BACKFILL_THRESHOLD
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            backfill_threshold: default_backfill_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// HTTP client settings.
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig::new(self.api.base_url.clone())
            .with_api_key(self.api.api_key.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs.max(1)))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://reqres.in/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.api.api_key.is_none());
        assert_eq!(config.list.backfill_threshold, 6);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[api]
base_url = "http://localhost:8080/api"
api_key = "reqres-free-v1"
timeout_secs = 5

[list]
backfill_threshold = 0
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.api_key.as_deref(), Some("reqres-free-v1"));
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.list.backfill_threshold, 0);
    }

    #[test]
    fn partial_sections_use_defaults() {
        let config: Config = toml::from_str("[api]\napi_key = \"k\"\n").unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.list.backfill_threshold, 6);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = Config::load_or_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn http_config_carries_settings() {
        let mut config = Config::default();
        config.api.api_key = Some("key".into());
        config.api.timeout_secs = 0;

        let http = config.http_config();
        assert_eq!(http.api_key.as_deref(), Some("key"));
        assert_eq!(http.timeout, Duration::from_secs(1));
    }
}
