//! Photo archive (storage service) client.

use async_trait::async_trait;
use petlog_core::diary::PhotoArchiveEntry;

/// Errors from the storage service.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The storage service returned a non-2xx status code.
    #[error("Storage service error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

/// Archives `(owner, image)` pairs in the external photo store.
#[async_trait]
pub trait PhotoArchive: Send + Sync {
    async fn save_photos(&self, entries: &[PhotoArchiveEntry]) -> Result<(), StorageError>;
}

/// `POST {base_url}/api/photos/archive` with a JSON array of entries.
pub struct HttpPhotoArchive {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPhotoArchive {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PhotoArchive for HttpPhotoArchive {
    async fn save_photos(&self, entries: &[PhotoArchiveEntry]) -> Result<(), StorageError> {
        let response = self
            .client
            .post(format!("{}/api/photos/archive", self.base_url))
            .json(entries)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
