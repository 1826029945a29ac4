//! Storage placement for encoded renditions.
//!
//! Two interchangeable backends, selected by deployment configuration: a
//! local durable filesystem serving files by static path, and a remote
//! media host that derives the thumbnail on the fly from a single uploaded
//! master. Both guarantee stable, publicly fetchable URLs.

pub mod local;
pub mod remote;

pub use local::LocalStorage;
pub use remote::RemoteStorage;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::{ConfigError, IngestError};

/// A durably stored asset with its addressable URLs.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    /// Asset identifier: file name (local) or public id (remote)
    pub id: String,

    /// URL of the full-size rendition
    pub url: String,

    /// URL of the thumbnail rendition (possibly transform-derived)
    pub thumbnail_url: String,
}

/// A durable home for renditions.
///
/// No partial-write recovery: if the master write succeeds and the
/// thumbnail write fails, the error propagates without rolling back the
/// master. The catalog entry is only created after the whole pipeline
/// returns successfully, so the orphan is harmless.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Whether this backend needs a physically encoded thumbnail file.
    ///
    /// Backends that transform on the fly return false and derive the
    /// thumbnail URL from the master instead.
    fn needs_thumbnail_file(&self) -> bool;

    /// Persist the renditions under `filename` and return their URLs.
    async fn store(
        &self,
        master: &[u8],
        thumbnail: Option<&[u8]>,
        filename: &str,
    ) -> Result<StoredAsset, IngestError>;

    /// Remove both renditions of a stored asset.
    ///
    /// An already-missing artifact is not an error (best-effort cleanup).
    async fn delete(&self, id: &str) -> Result<(), IngestError>;
}

/// Build the backend selected by configuration.
pub fn from_config(config: &Config) -> Result<Box<dyn StorageBackend>, ConfigError> {
    match config.storage.backend.as_str() {
        "local" => Ok(Box::new(LocalStorage::new(config))),
        "remote" => Ok(Box::new(RemoteStorage::new(config)?)),
        other => Err(ConfigError::ValidationError(format!(
            "unknown storage backend \"{}\"",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_local() {
        let config = Config::default();
        let backend = from_config(&config).unwrap();
        assert!(backend.needs_thumbnail_file());
    }

    #[test]
    fn test_from_config_remote() {
        let mut config = Config::default();
        config.storage.backend = "remote".to_string();
        config.remote.base_url = "https://media.example.com".to_string();
        let backend = from_config(&config).unwrap();
        assert!(!backend.needs_thumbnail_file());
    }

    #[test]
    fn test_from_config_unknown_backend() {
        let mut config = Config::default();
        config.storage.backend = "ftp".to_string();
        assert!(from_config(&config).is_err());
    }
}
