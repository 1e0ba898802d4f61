//! Filesystem-backed media store for development and tests.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{MediaError, MediaStore, StoredImage};

/// Stores images under a local directory and serves URLs beneath a
/// configured base. Mirrors the remote store's contract so handlers and
/// tests are indifferent to which one is wired in.
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, base_url: String) -> Self {
        Self { root, base_url }
    }

    /// Resolve a URL produced by this store back to its on-disk path.
    fn path_for_url(&self, url: &str) -> Result<PathBuf, MediaError> {
        let name = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| MediaError::UnknownUrl(url.to_string()))?;
        // Stored names are flat UUIDs; anything with a separator is foreign.
        if name.contains('/') || name.contains("..") {
            return Err(MediaError::UnknownUrl(url.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait::async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, staged_path: &Path) -> Result<StoredImage, MediaError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let extension = staged_path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let name = format!("{}{extension}", Uuid::new_v4());

        tokio::fs::copy(staged_path, self.root.join(&name)).await?;
        Ok(StoredImage {
            url: format!("{}/{name}", self.base_url),
        })
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let path = self.path_for_url(url)?;
        tokio::fs::remove_file(path).await?;
        Ok(())
    }
}
