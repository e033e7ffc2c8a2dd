//! User-wide configuration file.

use crate::core::CrexError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Settings read from `~/.crex/config.toml`.
///
/// Every field is optional. Command-line flags and environment variables win
/// over values from this file; built-in constants apply when neither is set.
///
/// ```toml
/// target = "deployer:s3cret@author.example.com:4502"
/// omit = ["**/.git/**", "**/*.tmp"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default target address, `user:password@host:port`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Default ignore patterns for `upload --compress`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omit: Vec<String>,
}

impl GlobalConfig {
    /// Load from `path` when given, otherwise from [`GlobalConfig::default_path`].
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match Self::default_path() {
                Ok(path) => path,
                Err(_) => return Ok(Self::default()),
            },
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .map_err(CrexError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Platform location of the configuration file.
    ///
    /// - **Windows**: `%LOCALAPPDATA%\crex\config.toml`
    /// - **Unix/macOS**: `~/.crex/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the home or local data directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("crex")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".crex")
        };

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_global_config_default() {
        let config = GlobalConfig::default();
        assert!(config.target.is_none());
        assert!(config.omit.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "target = \"deployer:pw@author:4503\"\nomit = [\"**/*.tmp\"]\n",
        )
        .unwrap();

        let config = GlobalConfig::load_from(&path).await.unwrap();
        assert_eq!(config.target.as_deref(), Some("deployer:pw@author:4503"));
        assert_eq!(config.omit, vec!["**/*.tmp"]);
    }

    #[tokio::test]
    async fn test_missing_file_yields_default() {
        let temp = TempDir::new().unwrap();
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("absent.toml"))).await.unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_toml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "target = [unterminated").unwrap();

        let err = GlobalConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(matches!(err.downcast_ref::<CrexError>(), Some(CrexError::TomlError(_))));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        if let Ok(path) = GlobalConfig::default_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
