//! Atelier Core - Photo ingestion library for a photography portfolio.
//!
//! Atelier takes the raw bytes of an uploaded photo and produces everything
//! a gallery catalog needs to persist: extracted EXIF metadata, a
//! web-optimized full-size rendition, a thumbnail, stable public URLs, and
//! normalized identifiers.
//!
//! # Architecture
//!
//! A single stateless pass per upload:
//!
//! ```text
//! Bytes → Validate → Extract EXIF → Transcode → Store → UploadResult
//! ```
//!
//! EXIF extraction always runs on the original bytes before re-encoding,
//! since re-encoding strips the metadata segment. Storage is a polymorphic
//! backend: a local uploads directory or a remote media host with
//! on-the-fly thumbnail transforms.
//!
//! # Usage
//!
//! ```rust,ignore
//! use atelier_core::{Config, Ingestor};
//!
//! #[tokio::main]
//! async fn main() -> atelier_core::Result<()> {
//!     let config = Config::load()?;
//!     let ingestor = Ingestor::new(&config)?;
//!
//!     let bytes = tokio::fs::read("./photo.jpg").await?;
//!     let result = ingestor.ingest(bytes, "photo.jpg").await
//!         .map_err(atelier_core::AtelierError::from)?;
//!     println!("Stored at {}", result.url);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod storage;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{AtelierError, ConfigError, IngestError, IngestResult, Result};
pub use pipeline::{slugify, Ingestor, MetadataExtractor, Transcoder};
pub use storage::{StorageBackend, StoredAsset};
pub use types::{ParsedExif, UploadResult};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
