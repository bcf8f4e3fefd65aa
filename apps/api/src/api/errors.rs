use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};

use crate::domain::errors::{DomainError, FieldError, RepositoryError};
use crate::infrastructure::uploads::UploadError;

/// API error type with HTTP status code, message and per-field details
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Vec<FieldError>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// 400 naming the offending fields
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            fields,
        }
    }

    /// Single-field 400
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({ "error": self.message });

        if !self.fields.is_empty() {
            let fields: Map<String, Value> = self
                .fields
                .into_iter()
                .map(|f| (f.field, Value::String(f.message)))
                .collect();
            body["fields"] = Value::Object(fields);
        }

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(fields) => Self::validation(fields),
            DomainError::NotFound { .. } => Self::not_found(err.to_string()),
            DomainError::Forbidden(message) => Self::forbidden(message),
            DomainError::Conflict(message) => Self::conflict(message),
            DomainError::InvalidTransition { .. } => Self::conflict(err.to_string()),
            DomainError::Repository(message) => {
                tracing::error!(error = %message, "Repository failure");
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => Self::not_found(err.to_string()),
            other => DomainError::from(other).into(),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => {
                tracing::error!(error = %e, "Failed to store upload");
                Self::internal_server_error("Failed to store file")
            }
            UploadError::TooLarge(_) => Self::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string()),
            other => Self::invalid_field("file", other.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::new(err.status(), err.body_text())
    }
}

/// Password hashing and token signing failures
impl From<String> for ApiError {
    fn from(message: String) -> Self {
        tracing::error!(error = %message, "Internal failure");
        Self::internal_server_error("Internal server error")
    }
}
