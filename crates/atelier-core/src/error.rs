//! Error types for the Atelier ingestion pipeline.
//!
//! Errors carry the context a caller needs to reject an upload with a
//! human-readable message (file name, stage, underlying cause). Metadata
//! parse failures are never surfaced here; the EXIF extractor swallows
//! them and returns an empty record instead.

use thiserror::Error;

/// Top-level error type for Atelier operations.
#[derive(Error, Debug)]
pub enum AtelierError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Ingestion pipeline errors
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Ingestion errors, organized by stage.
///
/// All variants are fatal for the invocation: the caller must not create a
/// catalog entry when any of these is returned. There is no rollback of a
/// sibling artifact that was already written.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Upload contained no bytes
    #[error("Empty upload: {name}")]
    EmptyUpload { name: String },

    /// Upload exceeds the configured size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Bytes do not look like any supported image format
    #[error("Unrecognized image format: {name}")]
    UnrecognizedFormat { name: String },

    /// Image decoding failed (corrupt file, unsupported codec)
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// Rendition encoding failed
    #[error("Encode error for {name}: {message}")]
    Encode { name: String, message: String },

    /// Storage write or delete failed
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Remote media host rejected the request
    #[error("Remote media host returned {status}: {message}")]
    Remote { status: u16, message: String },
}

/// Convenience type alias for Atelier results.
pub type Result<T> = std::result::Result<T, AtelierError>;

/// Convenience type alias for ingestion-specific results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
