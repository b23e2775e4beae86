//! Application configuration and persistence utilities.
//!
//! The config file is optional: every field has a default, and the CLI
//! overrides individual values with flags.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::balance::Denomination;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the node/proxy REST API queried for the network status.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Index name prefix; the current epoch is appended.
    #[serde(default = "default_base_index_name")]
    pub base_index_name: String,
    /// Scaling applied to the approximate totals.
    #[serde(default)]
    pub denomination: Denomination,
    /// Directory holding the per-source account snapshots.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,
    /// Timeout for REST requests, in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8079".to_string()
}

fn default_base_index_name() -> String {
    "accounts".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            base_index_name: default_base_index_name(),
            denomination: Denomination::RAW,
            snapshot_dir: None,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Returns an error if a required value is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Other("api_url must not be empty".to_string()));
        }
        if self.base_index_name.trim().is_empty() {
            return Err(ConfigError::Other(
                "base_index_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ==================== Path Utilities ====================

/// Get the config directory.
/// Uses platform-specific paths via `directories` crate.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("io", "stakeidx", "stakeidx")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}

// ==================== Config I/O ====================

/// Load configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path()?)
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path()?)
}

/// Save configuration to `path`, creating parent directories.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_index_name, "accounts");
        assert_eq!(config.denomination, Denomination::RAW);
        assert!(config.snapshot_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"base_index_name":"accounts-000001"}"#).unwrap();
        assert_eq!(config.base_index_name, "accounts-000001");
        assert_eq!(config.api_url, default_api_url());
        assert_eq!(config.denomination.decimals, 0);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            api_url: "https://gateway.example".into(),
            denomination: Denomination::new(18),
            snapshot_dir: Some(PathBuf::from("/var/lib/stakeidx")),
            ..AppConfig::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_blank_index_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"base_index_name":"  "}"#).unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Other(_))));
    }
}
