//! Local filesystem storage under a dedicated uploads directory.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::IngestError;
use crate::pipeline::naming::thumbnail_filename;

use super::{StorageBackend, StoredAsset};

/// Stores renditions as files under the configured uploads directory,
/// served by static path.
pub struct LocalStorage {
    upload_dir: PathBuf,
    public_prefix: String,
}

impl LocalStorage {
    /// Create a local backend from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            upload_dir: config.upload_dir(),
            public_prefix: config
                .storage
                .public_prefix
                .trim_end_matches('/')
                .to_string(),
        }
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.public_prefix, filename)
    }

    /// Remove a single file, treating "already gone" as success.
    async fn remove_if_present(&self, filename: &str) -> Result<(), IngestError> {
        match tokio::fs::remove_file(self.upload_dir.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(IngestError::Storage {
                message: format!("failed to delete {}: {}", filename, e),
            }),
        }
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    fn needs_thumbnail_file(&self) -> bool {
        true
    }

    async fn store(
        &self,
        master: &[u8],
        thumbnail: Option<&[u8]>,
        filename: &str,
    ) -> Result<StoredAsset, IngestError> {
        let thumbnail = thumbnail.ok_or_else(|| IngestError::Storage {
            message: "local backend requires a thumbnail rendition".to_string(),
        })?;

        // Idempotent: create the uploads directory if absent
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| IngestError::Storage {
                message: format!(
                    "failed to create uploads dir {}: {}",
                    self.upload_dir.display(),
                    e
                ),
            })?;

        let thumb_name = thumbnail_filename(filename);

        tokio::fs::write(self.upload_dir.join(filename), master)
            .await
            .map_err(|e| IngestError::Storage {
                message: format!("failed to write {}: {}", filename, e),
            })?;

        // A failure here leaves the master in place; no rollback
        tokio::fs::write(self.upload_dir.join(&thumb_name), thumbnail)
            .await
            .map_err(|e| IngestError::Storage {
                message: format!("failed to write {}: {}", thumb_name, e),
            })?;

        tracing::debug!("Stored {} and {}", filename, thumb_name);

        Ok(StoredAsset {
            id: filename.to_string(),
            url: self.public_url(filename),
            thumbnail_url: self.public_url(&thumb_name),
        })
    }

    async fn delete(&self, id: &str) -> Result<(), IngestError> {
        self.remove_if_present(id).await?;
        self.remove_if_present(&thumbnail_filename(id)).await?;
        tracing::debug!("Deleted {} and its thumbnail", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_in(dir: &std::path::Path) -> LocalStorage {
        let mut config = Config::default();
        config.storage.upload_dir = dir.to_path_buf();
        LocalStorage::new(&config)
    }

    #[tokio::test]
    async fn test_store_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_in(dir.path());

        let asset = storage
            .store(b"master", Some(b"thumb".as_slice()), "1712-cat.jpg")
            .await
            .unwrap();

        assert_eq!(asset.id, "1712-cat.jpg");
        assert_eq!(asset.url, "/uploads/1712-cat.jpg");
        assert_eq!(asset.thumbnail_url, "/uploads/1712-cat_thumb.jpg");
        assert_eq!(
            std::fs::read(dir.path().join("1712-cat.jpg")).unwrap(),
            b"master"
        );
        assert_eq!(
            std::fs::read(dir.path().join("1712-cat_thumb.jpg")).unwrap(),
            b"thumb"
        );
    }

    #[tokio::test]
    async fn test_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("public").join("uploads");
        let storage = local_in(&nested);

        storage
            .store(b"m", Some(b"t".as_slice()), "a.jpg")
            .await
            .unwrap();
        assert!(nested.join("a.jpg").exists());
    }

    #[tokio::test]
    async fn test_store_without_thumbnail_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_in(dir.path());
        let err = storage.store(b"m", None, "a.jpg").await.unwrap_err();
        assert!(matches!(err, IngestError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_delete_removes_both_renditions() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_in(dir.path());
        storage.store(b"m", Some(b"t".as_slice()), "a.jpg").await.unwrap();

        storage.delete("a.jpg").await.unwrap();
        assert!(!dir.path().join("a.jpg").exists());
        assert!(!dir.path().join("a_thumb.jpg").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_asset_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = local_in(dir.path());
        storage.delete("never-stored.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_public_prefix_trailing_slash_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.upload_dir = dir.path().to_path_buf();
        config.storage.public_prefix = "/media/".to_string();
        let storage = LocalStorage::new(&config);

        let asset = storage.store(b"m", Some(b"t".as_slice()), "a.jpg").await.unwrap();
        assert_eq!(asset.url, "/media/a.jpg");
    }
}
