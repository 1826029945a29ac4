//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend != "local" && self.storage.backend != "remote" {
            return Err(ConfigError::ValidationError(format!(
                "storage.backend must be \"local\" or \"remote\", got \"{}\"",
                self.storage.backend
            )));
        }
        if self.storage.backend == "remote" && self.remote.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "remote.base_url must be set when storage.backend is \"remote\"".into(),
            ));
        }
        if self.renditions.max_width == 0 {
            return Err(ConfigError::ValidationError(
                "renditions.max_width must be > 0".into(),
            ));
        }
        if self.renditions.thumbnail_width == 0 {
            return Err(ConfigError::ValidationError(
                "renditions.thumbnail_width must be > 0".into(),
            ));
        }
        if self.renditions.thumbnail_width > self.renditions.max_width {
            return Err(ConfigError::ValidationError(
                "renditions.thumbnail_width must not exceed renditions.max_width".into(),
            ));
        }
        if self.renditions.quality == 0 || self.renditions.quality > 100 {
            return Err(ConfigError::ValidationError(
                "renditions.quality must be between 1 and 100".into(),
            ));
        }
        if self.renditions.thumbnail_quality == 0 || self.renditions.thumbnail_quality > 100 {
            return Err(ConfigError::ValidationError(
                "renditions.thumbnail_quality must be between 1 and 100".into(),
            ));
        }
        if self.renditions.pre_resize_bound == 0 {
            return Err(ConfigError::ValidationError(
                "renditions.pre_resize_bound must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.remote.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "remote.timeout_ms must be > 0".into(),
            ));
        }
        Ok(())
    }
}
