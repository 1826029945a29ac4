//! Sub-configuration structs with defaults matching the production deployment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend selection: "local" or "remote"
    pub backend: String,

    /// Uploads directory for the local backend
    pub upload_dir: PathBuf,

    /// URL prefix under which the uploads directory is served
    pub public_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            upload_dir: PathBuf::from("public/uploads"),
            public_prefix: "/uploads".to_string(),
        }
    }
}

/// Remote media host settings, used when `storage.backend = "remote"`.
///
/// The host serves assets by public id and applies width/quality transforms
/// on the fly, so the thumbnail never exists as a second physical file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the media host (e.g. "https://media.example.com")
    pub base_url: String,

    /// Bearer token for upload/delete requests. Empty means unauthenticated.
    pub auth_token: String,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_token: String::new(),
            timeout_ms: 30_000,
        }
    }
}

/// Rendition geometry and encoding settings.
///
/// Renditions only ever shrink to fit the configured maximum width; an image
/// already narrower than the bound is encoded at its own size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenditionConfig {
    /// Maximum width of the full-size web rendition
    pub max_width: u32,

    /// JPEG quality of the full-size rendition (1-100)
    pub quality: u8,

    /// Maximum width of the thumbnail rendition
    pub thumbnail_width: u32,

    /// JPEG quality of the thumbnail rendition (1-100)
    pub thumbnail_quality: u8,

    /// Pre-compression bound: inputs with either dimension above this are
    /// scaled down first, to stay under remote-host size ceilings
    pub pre_resize_bound: u32,
}

impl Default for RenditionConfig {
    fn default() -> Self {
        Self {
            max_width: 2400,
            quality: 85,
            thumbnail_width: 600,
            thumbnail_quality: 80,
            pre_resize_bound: 4000,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum upload size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Output format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
