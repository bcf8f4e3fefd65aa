pub mod auth;
pub mod categories;
pub mod complaints;
pub mod departments;
pub mod grievances;
pub mod notifications;
pub mod officers;

use axum::{body::Bytes, extract::Multipart};

use crate::api::errors::ApiError;
use crate::infrastructure::uploads::FileStore;

const FILE_FIELD: &str = "file";

/// Pulls the `file` part out of a multipart body, ignoring other parts
pub(crate) async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok((file_name, bytes));
    }
    Err(ApiError::invalid_field(FILE_FIELD, "Missing file field"))
}

/// Deletes a stored upload that is no longer referenced; failures are logged
pub(crate) async fn discard_upload(uploads: &FileStore, path: &str) {
    if let Err(e) = uploads.remove(path).await {
        tracing::warn!(path, error = %e, "Failed to remove stale upload");
    }
}
