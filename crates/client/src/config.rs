//! Client configuration: TOML file + environment overrides.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working development setup pointed at a local API.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bloodbank_observability::LogSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_API_URL: &str = "BLOODBANK_API_URL";
pub const ENV_LOG_LEVEL: &str = "BLOODBANK_LOG_LEVEL";
pub const ENV_DATA_DIR: &str = "BLOODBANK_DATA_DIR";

const APP_DIR_NAME: &str = "bloodbank-admin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no OS app data directory: tried data_dir() and home_dir()/.local/share")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST API, e.g. `https://bloodbank.example.org/api`.
    pub api_base_url: String,
    /// How long a toast stays on screen.
    pub toast_duration_ms: u64,
    /// Quiet period before a search box fires its query.
    pub search_debounce_ms: u64,
    pub default_page_limit: u64,
    pub max_page_limit: u64,
    /// Where client-local state (the theme preference) lives.
    pub data_dir: Option<PathBuf>,
    pub log: LogSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            toast_duration_ms: 5_000,
            search_debounce_ms: 300,
            default_page_limit: bloodbank_core::DEFAULT_LIMIT,
            max_page_limit: bloodbank_core::DEFAULT_MAX_LIMIT,
            data_dir: None,
            log: LogSettings::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from `path` (or defaults), apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log.level = level;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.max_page_limit == 0 {
            return Err(ConfigError::Invalid("max_page_limit must be at least 1".into()));
        }
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(format!(
                "default_page_limit must be within 1..={}",
                self.max_page_limit
            )));
        }
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Configured data directory, or the OS app-data directory.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let base = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .ok_or(ConfigError::NoDataDir)?;

        Ok(base.join(APP_DIR_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_toml_is_default() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://bloodbank.example.org/api"
            toast_duration_ms = 3000

            [log]
            level = "bloodbank_client=debug"
            format = "pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://bloodbank.example.org/api");
        assert_eq!(config.toast_duration(), Duration::from_secs(3));
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.log.level, "bloodbank_client=debug");
    }

    #[test]
    fn overrides_win_over_file() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://staging.example.org/api"),
            (ENV_DATA_DIR, "/tmp/bloodbank"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://staging.example.org/api");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/bloodbank"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.api_base_url = "localhost:5000".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ClientConfig::default();
        config.default_page_limit = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            ClientConfig::from_toml_str("toast_duration_ms = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "max_page_limit = 50\ndefault_page_limit = 25\n").unwrap();

        let config = ClientConfig::load(Some(&path)).unwrap();
        assert_eq!(config.max_page_limit, 50);
        assert_eq!(config.default_page_limit, 25);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = ClientConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
