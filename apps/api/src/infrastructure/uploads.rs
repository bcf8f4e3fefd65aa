// Upload storage for complaint/grievance images and officer proof documents
// Files land under <root>/<kind>/<uuid>.<ext>; callers store the relative path

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const DOCUMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// What an upload is attached to; decides sub-directory and allowed types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    ComplaintImage,
    GrievanceImage,
    OfficerProof,
}

impl UploadKind {
    fn directory(&self) -> &'static str {
        match self {
            UploadKind::ComplaintImage => "complaints",
            UploadKind::GrievanceImage => "grievances",
            UploadKind::OfficerProof => "officers",
        }
    }

    fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::ComplaintImage | UploadKind::GrievanceImage => IMAGE_EXTENSIONS,
            UploadKind::OfficerProof => DOCUMENT_EXTENSIONS,
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File is empty")]
    Empty,

    #[error("File exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Unsupported file type; allowed: {0}")]
    UnsupportedType(String),

    #[error("Failed to store file: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded files below a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    max_bytes: usize,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validates and writes a file, returning its path relative to the root
    ///
    /// The stored name is generated; only the extension of `original_name`
    /// is kept.
    pub async fn save(
        &self,
        kind: UploadKind,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge(self.max_bytes));
        }

        let allowed = kind.allowed_extensions();
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .filter(|e| allowed.contains(&e.as_str()))
            .ok_or_else(|| UploadError::UnsupportedType(allowed.join(", ")))?;

        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        tracing::debug!(kind = ?kind, file = %file_name, size = bytes.len(), "Stored upload");

        Ok(format!("{}/{}", kind.directory(), file_name))
    }

    /// Deletes a file previously returned by `save`
    ///
    /// Missing files are ignored, as are paths that would leave the root.
    pub async fn remove(&self, relative: &str) -> Result<(), UploadError> {
        let path = Path::new(relative);
        if !path.components().all(|c| matches!(c, Component::Normal(_))) {
            tracing::warn!(path = relative, "Refusing to remove upload outside the store");
            return Ok(());
        }

        match tokio::fs::remove_file(self.root.join(path)).await {
            Ok(()) => {
                tracing::debug!(file = relative, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
