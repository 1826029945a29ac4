//! Remote media host storage with on-the-fly thumbnail transforms.
//!
//! The host serves assets by public id. Only the master is uploaded; the
//! thumbnail URL embeds width/quality transform parameters and is derived
//! on demand, so deletion is a single call keyed by the public id.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::error::{ConfigError, IngestError};

use super::{StorageBackend, StoredAsset};

/// Stores renditions on a remote media host over HTTP.
pub struct RemoteStorage {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    thumbnail_width: u32,
    thumbnail_quality: u8,
}

impl RemoteStorage {
    /// Create a remote backend from configuration.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.remote.timeout_ms))
            .build()
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {}", e)))?;

        let auth_token = if config.remote.auth_token.is_empty() {
            None
        } else {
            Some(config.remote.auth_token.clone())
        };

        Ok(Self {
            client,
            base_url: config.remote.base_url.trim_end_matches('/').to_string(),
            auth_token,
            thumbnail_width: config.renditions.thumbnail_width,
            thumbnail_quality: config.renditions.thumbnail_quality,
        })
    }

    /// Public URL of the full-size asset.
    fn media_url(&self, id: &str) -> String {
        format!("{}/media/{}", self.base_url, id)
    }

    /// Derived thumbnail URL with transform query parameters.
    fn derived_thumbnail_url(&self, id: &str) -> String {
        format!(
            "{}?w={}&q={}",
            self.media_url(id),
            self.thumbnail_width,
            self.thumbnail_quality
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<(), IngestError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(IngestError::Remote {
            status: status.as_u16(),
            message: message.chars().take(200).collect(),
        })
    }
}

#[async_trait]
impl StorageBackend for RemoteStorage {
    fn needs_thumbnail_file(&self) -> bool {
        false
    }

    async fn store(
        &self,
        master: &[u8],
        _thumbnail: Option<&[u8]>,
        filename: &str,
    ) -> Result<StoredAsset, IngestError> {
        let url = self.media_url(filename);
        let response = self
            .authorize(self.client.put(&url))
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(master.to_vec())
            .send()
            .await
            .map_err(|e| IngestError::Storage {
                message: format!("upload to {}: {}", url, e),
            })?;
        Self::check_status(response).await?;

        tracing::debug!("Uploaded {} to media host", filename);

        Ok(StoredAsset {
            id: filename.to_string(),
            url: self.media_url(filename),
            thumbnail_url: self.derived_thumbnail_url(filename),
        })
    }

    async fn delete(&self, id: &str) -> Result<(), IngestError> {
        let url = self.media_url(id);
        let response = self
            .authorize(self.client.delete(&url))
            .send()
            .await
            .map_err(|e| IngestError::Storage {
                message: format!("delete of {}: {}", url, e),
            })?;

        // Already gone counts as deleted (best-effort cleanup)
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check_status(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteStorage {
        let mut config = Config::default();
        config.storage.backend = "remote".to_string();
        config.remote.base_url = "https://media.example.com/".to_string();
        RemoteStorage::new(&config).unwrap()
    }

    #[test]
    fn test_media_url_strips_trailing_slash() {
        assert_eq!(
            remote().media_url("1712-cat.jpg"),
            "https://media.example.com/media/1712-cat.jpg"
        );
    }

    #[test]
    fn test_derived_thumbnail_url_embeds_transforms() {
        assert_eq!(
            remote().derived_thumbnail_url("1712-cat.jpg"),
            "https://media.example.com/media/1712-cat.jpg?w=600&q=80"
        );
    }

    #[test]
    fn test_no_thumbnail_file_needed() {
        assert!(!remote().needs_thumbnail_file());
    }
}
