//! Configuration management for Atelier.
//!
//! Configuration is loaded from a platform-appropriate config directory with
//! sensible defaults for every field, so a missing config file is not an
//! error. All config structs implement `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Atelier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage placement settings
    pub storage: StorageConfig,

    /// Remote media host settings
    pub remote: RemoteConfig,

    /// Rendition geometry and encoding settings
    pub renditions: RenditionConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.atelier.atelier/config.toml
    /// - Linux: ~/.config/atelier/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\atelier\config\config.toml
    ///
    /// Falls back to ~/.atelier/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "atelier", "atelier")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".atelier").join("config.toml")
            })
    }

    /// Get the resolved uploads directory path (with ~ expansion).
    pub fn upload_dir(&self) -> PathBuf {
        let path_str = self.storage.upload_dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.backend, "local");
        assert_eq!(config.renditions.max_width, 2400);
        assert_eq!(config.renditions.thumbnail_width, 600);
        assert_eq!(config.limits.max_file_size_mb, 50);
    }

    #[test]
    fn test_load_from_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[renditions]
max_width = 1920
quality = 88

[storage]
upload_dir = "/srv/photos/uploads"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.renditions.max_width, 1920);
        assert_eq!(config.renditions.quality, 88);
        // Unspecified fields fall back to defaults
        assert_eq!(config.renditions.thumbnail_width, 600);
        assert_eq!(config.storage.backend, "local");
        assert_eq!(
            config.storage.upload_dir,
            PathBuf::from("/srv/photos/uploads")
        );
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "renditions = not valid").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_upload_dir_tilde_expansion() {
        let mut config = Config::default();
        config.storage.upload_dir = PathBuf::from("~/photos/uploads");
        let resolved = config.upload_dir();
        assert!(!resolved.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.renditions.max_width, config.renditions.max_width);
        assert_eq!(parsed.storage.backend, config.storage.backend);
    }
}
