//! HTTP client for the hosted image service.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{MediaError, MediaStore, StoredImage};

/// Response returned by the image host's upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Durable URL of the stored image.
    url: String,
}

/// Client for a hosted image service over HTTP.
///
/// Every request carries the API key as a bearer credential and is bounded
/// by the configured timeout, so a hung upload cannot stall the enclosing
/// request indefinitely.
pub struct RemoteImageHost {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteImageHost {
    /// Create a new client.
    ///
    /// * `base_url` - service root, e.g. `https://img.example.com`.
    /// * `api_key` - bearer credential for the service.
    /// * `timeout` - per-request upper bound covering connect and body.
    pub fn new(
        base_url: String,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, MediaError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::try_from(format!("Bearer {api_key}"))
            .map_err(|_| MediaError::ApiError {
                status: 0,
                body: "API key contains invalid header characters".to_string(),
            })?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Check a response status, capturing the body of failures for logs.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(MediaError::ApiError {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl MediaStore for RemoteImageHost {
    async fn upload(&self, staged_path: &Path) -> Result<StoredImage, MediaError> {
        let bytes = tokio::fs::read(staged_path).await?;
        let file_name = staged_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let parsed: UploadResponse = response.json().await?;
        Ok(StoredImage { url: parsed.url })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .delete(format!("{}/images", self.base_url))
            .query(&[("url", url)])
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
