//! Ingestion pipeline components.
//!
//! The stages of the upload pipeline:
//! - **validate**: cheap pre-decode checks on the raw bytes
//! - **metadata**: extract EXIF before any lossy re-encoding
//! - **transcode**: decode, auto-rotate, shrink-to-fit, JPEG encode
//! - **naming**: storage filenames and catalog slugs
//! - **ingestor**: orchestrates the full pipeline

pub mod ingestor;
pub mod metadata;
pub mod naming;
pub mod transcode;
pub mod validate;

// Re-exports for convenient access
pub use ingestor::Ingestor;
pub use metadata::MetadataExtractor;
pub use naming::slugify;
pub use transcode::{EncodedRendition, TranscodeOutput, Transcoder};
pub use validate::Validator;
