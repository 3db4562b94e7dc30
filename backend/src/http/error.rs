//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::dto::Envelope;
use crate::db::repository::RepositoryError;
use crate::services::InputError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request body or query rejected before reaching the repository
    Input(InputError),
    /// Query string or body the extractors could not read
    Rejected { status: StatusCode, message: String },
    /// Resource not found
    NotFound(String),
    /// Verb not served by this resource
    MethodNotAllowed,
    /// Repository error
    Repository(RepositoryError),
}

impl AppError {
    /// Status code and caller-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Input(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Rejected { status, message } => (*status, message.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
            }
            AppError::Repository(e) => match e {
                RepositoryError::ValidationError { message, .. } => {
                    (StatusCode::BAD_REQUEST, message.clone())
                }
                RepositoryError::DuplicateKey { field, .. } => {
                    (StatusCode::BAD_REQUEST, field.message().to_string())
                }
                RepositoryError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "Student not found".to_string())
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Server error: {}", other),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        }

        (status, Json(Envelope::error(message))).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::Input(err)
    }
}
