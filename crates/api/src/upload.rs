//! Multipart upload staging.
//!
//! File fields arrive under named slots (`avatar`, `blogImage`), each
//! accepting at most one file. Files are written to a transient staging
//! directory before the handler runs its logic; the staged copy is removed
//! when its handle drops, so both promoted uploads and rejected requests
//! leave the staging directory empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::Multipart;
use inkpost_media::{MediaStore, StoredImage};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A file staged to local disk, awaiting upload to the image host.
///
/// The staged copy is deleted on drop. A request that fails validation
/// after its file was staged (or a form whose file slot is never taken)
/// therefore leaves nothing behind.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub file_name: String,
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove staged upload"
                );
            }
        }
    }
}

/// Parsed multipart form: text fields plus at most one staged file per
/// declared slot.
#[derive(Debug, Default)]
pub struct StagedForm {
    texts: HashMap<String, String>,
    files: HashMap<String, StagedFile>,
}

impl StagedForm {
    /// Get a text field, trimmed; `None` when absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(|s| s.trim())
    }

    /// Get a text field as an owned `String`, or `None` when absent or blank.
    pub fn text_owned(&self, name: &str) -> Option<String> {
        self.text(name)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }

    /// Take ownership of the staged file under a slot, if one arrived.
    pub fn take_file(&mut self, slot: &str) -> Option<StagedFile> {
        self.files.remove(slot)
    }
}

/// Drain a multipart request, staging file fields from the declared slots
/// to `staging_dir` and collecting text fields.
///
/// A second file under the same slot, or a file under an undeclared slot,
/// is a 400.
pub async fn stage_form(
    mut multipart: Multipart,
    staging_dir: &Path,
    file_slots: &[&str],
) -> AppResult<StagedForm> {
    tokio::fs::create_dir_all(staging_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create staging dir: {e}")))?;

    let mut form = StagedForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        if field.file_name().is_none() {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.texts.insert(name, value);
            continue;
        }

        if !file_slots.contains(&name.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unexpected file field: {name}"
            )));
        }
        if form.files.contains_key(&name) {
            return Err(AppError::BadRequest(format!(
                "At most one file is allowed for {name}"
            )));
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        // Keep the client's extension so the media store can preserve it.
        let extension = Path::new(&file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let staged_path = staging_dir.join(format!("{}{extension}", Uuid::new_v4()));

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        tokio::fs::write(&staged_path, &data)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to stage upload: {e}")))?;

        form.files.insert(
            name,
            StagedFile {
                path: staged_path,
                file_name,
            },
        );
    }

    Ok(form)
}

/// Hand a staged file to the media collaborator.
///
/// The local staged copy is removed when `staged` drops here, whether the
/// upload succeeded or not.
pub async fn promote(media: &dyn MediaStore, staged: StagedFile) -> AppResult<StoredImage> {
    let stored = media.upload(&staged.path).await?;
    Ok(stored)
}
