//! Pipeline orchestration - wires together all ingestion stages.

use crate::config::Config;
use crate::error::{ConfigError, IngestError};
use crate::storage::{self, StorageBackend};
use crate::types::UploadResult;

use super::metadata::MetadataExtractor;
use super::naming;
use super::transcode::Transcoder;
use super::validate::Validator;

/// The main ingestion pipeline: one synchronous pass per uploaded file.
///
/// Holds no shared mutable state between invocations; concurrent ingests
/// are independent and need no locking. A failed run is simply retried by
/// the caller submitting the same bytes again.
pub struct Ingestor {
    validator: Validator,
    transcoder: Transcoder,
    storage: Box<dyn StorageBackend>,
}

impl Ingestor {
    /// Create an ingestor with the backend selected by configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let storage = storage::from_config(config)?;
        Ok(Self::with_backend(config, storage))
    }

    /// Create an ingestor with an explicit backend.
    pub fn with_backend(config: &Config, storage: Box<dyn StorageBackend>) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            transcoder: Transcoder::new(config.renditions.clone()),
            storage,
        }
    }

    /// Run the full pipeline on one upload.
    ///
    /// EXIF extraction runs on the original bytes before any re-encoding.
    /// Decode and storage failures propagate; the catalog entry must only
    /// be created when this returns `Ok`.
    pub async fn ingest(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
    ) -> Result<UploadResult, IngestError> {
        let start = std::time::Instant::now();
        tracing::debug!("Ingesting {}", original_name);

        self.validator.validate(&bytes, original_name)?;

        // Metadata first: re-encoding strips the EXIF segment
        let exif = MetadataExtractor::extract(&bytes);
        let orientation = MetadataExtractor::orientation(&bytes);

        let want_thumbnail = self.storage.needs_thumbnail_file();
        let output = self
            .transcoder
            .transcode(bytes, original_name, orientation, want_thumbnail)
            .await?;

        let filename = naming::storage_filename(original_name, "jpg");
        let stored = self
            .storage
            .store(
                &output.master.bytes,
                output.thumbnail.as_ref().map(|t| t.bytes.as_slice()),
                &filename,
            )
            .await?;

        tracing::info!(
            "Ingested {} as {} ({}x{}) in {:?}",
            original_name,
            stored.id,
            output.original_width,
            output.original_height,
            start.elapsed()
        );

        Ok(UploadResult {
            filename: stored.id,
            url: stored.url,
            thumbnail_url: stored.thumbnail_url,
            width: output.original_width,
            height: output.original_height,
            exif,
        })
    }

    /// Remove both renditions of a stored asset.
    pub async fn remove(&self, id: &str) -> Result<(), IngestError> {
        self.storage.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn local_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.storage.upload_dir = dir.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_ingest_end_to_end_local() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = Ingestor::new(&local_config(dir.path())).unwrap();

        let result = ingestor
            .ingest(png_bytes(3000, 2000), "DSC_0042.png")
            .await
            .unwrap();

        // Original dimensions, not rendition dimensions
        assert_eq!(result.width, 3000);
        assert_eq!(result.height, 2000);
        // PNG synthesized in-memory carries no metadata segment
        assert!(result.exif.is_empty());
        // Both renditions exist on disk
        let main = dir.path().join(&result.filename);
        assert!(main.exists());
        let thumb_name = naming::thumbnail_filename(&result.filename);
        assert!(dir.path().join(&thumb_name).exists());
        // URLs point into the public prefix
        assert_eq!(result.url, format!("/uploads/{}", result.filename));
        assert_eq!(result.thumbnail_url, format!("/uploads/{}", thumb_name));
        // Stored master is bounded by the configured max width
        let stored = image::load_from_memory(&std::fs::read(&main).unwrap()).unwrap();
        assert!(stored.width() <= 2400);
    }

    #[tokio::test]
    async fn test_ingest_then_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = Ingestor::new(&local_config(dir.path())).unwrap();

        let result = ingestor
            .ingest(png_bytes(800, 600), "roundtrip.png")
            .await
            .unwrap();
        ingestor.remove(&result.filename).await.unwrap();

        assert!(!dir.path().join(&result.filename).exists());
        assert!(!dir
            .path()
            .join(naming::thumbnail_filename(&result.filename))
            .exists());
    }

    #[tokio::test]
    async fn test_ingest_corrupt_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = Ingestor::new(&local_config(dir.path())).unwrap();

        // Valid JPEG magic, garbage body: passes validation, fails decode
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(&[0x55; 64]);
        let err = ingestor.ingest(bytes, "corrupt.jpg").await.unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_ingest_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = Ingestor::new(&local_config(dir.path())).unwrap();
        let err = ingestor
            .ingest(b"just some text".to_vec(), "notes.txt")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::UnrecognizedFormat { .. }));
    }

    #[tokio::test]
    async fn test_ingest_failure_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = Ingestor::new(&local_config(dir.path())).unwrap();
        let _ = ingestor
            .ingest(b"not an image".to_vec(), "bad.bin")
            .await
            .unwrap_err();
        // Nothing was placed in storage
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
