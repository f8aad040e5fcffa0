//! # Configuration
//!
//! `config.toml` in `<config_dir>/admin-store/` (or the path in `ADMIN_STORE_CONFIG`):
//!
//! ```toml
//! [api]
//! base_url = "https://erp.example.com/api"
//! timeout_seconds = 30
//! connect_timeout_seconds = 5
//! bearer_token = "..."
//!
//! [store]
//! intent_buffer = 64
//!
//! [pagination]
//! default_page_size = 20
//! max_page_size = 100
//! ```
//!
//! Every section and key is optional; a missing file means all defaults.

use resource_slice::{HttpConfig, PageLimits};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "ADMIN_STORE_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub store: StoreConfig,
    pub pagination: PaginationConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    pub connect_timeout_seconds: u32,
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Capacity of the store's intent channel (default: 64).
    pub intent_buffer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            timeout_seconds: 30,
            connect_timeout_seconds: 5,
            bearer_token: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { intent_buffer: 64 }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_size,
            max_page_size: limits.max_size,
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// `ADMIN_STORE_CONFIG` wins when set; otherwise `admin-store/config.toml` under
    /// `dirs::config_dir()`, falling back to the current directory.
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("admin-store").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `AppConfig::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| Err(ConfigError::ValidationError { message });

        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return invalid(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            ));
        }
        if self.api.timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return invalid("api timeouts must be at least one second".to_string());
        }
        if self.store.intent_buffer == 0 {
            return invalid("store.intent_buffer must be positive".to_string());
        }
        let pages = &self.pagination;
        if pages.max_page_size == 0 || pages.default_page_size == 0 {
            return invalid("page sizes must be positive".to_string());
        }
        if pages.default_page_size > pages.max_page_size {
            return invalid(format!(
                "pagination.default_page_size ({}) exceeds max_page_size ({})",
                pages.default_page_size, pages.max_page_size
            ));
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api.base_url.trim().to_string(),
            timeout: Duration::from_secs(u64::from(self.api.timeout_seconds)),
            connect_timeout: Duration::from_secs(u64::from(self.api.connect_timeout_seconds)),
            bearer_token: self.api.bearer_token.clone().filter(|t| !t.is_empty()),
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_size: self.pagination.default_page_size,
            max_size: self.pagination.max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_limits(), PageLimits::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
[api]
base_url = "https://erp.example.com/api"
bearer_token = "abc"

[pagination]
default_page_size = 50
"#,
        );
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://erp.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.store.intent_buffer, 64);
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.pagination.max_page_size, 100);

        let http = config.http_config();
        assert_eq!(http.bearer_token.as_deref(), Some("abc"));
        assert_eq!(http.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let file = write_config("[api\nbase_url = 1");
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn default_page_size_cannot_exceed_max() {
        let file = write_config(
            r#"
[pagination]
default_page_size = 200
max_page_size = 100
"#,
        );
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref message } if message.contains("exceeds")));
    }

    #[test]
    fn base_url_must_be_http() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://files".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_token_is_not_sent() {
        let mut config = AppConfig::default();
        config.api.bearer_token = Some(String::new());
        assert!(config.http_config().bearer_token.is_none());
    }
}
