//! Image-hosting collaborator.
//!
//! Staged upload files are handed to a [`MediaStore`], which returns a
//! durable URL; only the URL is persisted. Two implementations:
//! [`remote::RemoteImageHost`] talks to the hosted image service over
//! HTTP, [`local::LocalMediaStore`] keeps files on disk for development
//! and tests.

pub mod local;
pub mod remote;

use std::path::Path;

pub use local::LocalMediaStore;
pub use remote::RemoteImageHost;

/// A durable image reference returned by the hosting collaborator.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub url: String,
}

/// Errors from the media layer.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Reading the staged file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The image host returned a non-2xx status code.
    #[error("Image host error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The given URL does not belong to this store.
    #[error("Unrecognized image URL: {0}")]
    UnknownUrl(String),
}

/// Abstraction over the external image-hosting service.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a staged local file, returning its durable URL.
    async fn upload(&self, staged_path: &Path) -> Result<StoredImage, MediaError>;

    /// Delete a previously uploaded image by URL.
    async fn delete(&self, url: &str) -> Result<(), MediaError>;
}
