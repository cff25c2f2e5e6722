//! HTTP error type for the admin service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or stale session token (401).
    #[error("Authentication required")]
    Unauthorized,

    /// Wrong login credentials (401).
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Entity does not exist (404).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad request payload (400).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Anything that went wrong below the HTTP layer (500). The detail is
    /// logged, not leaked.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized | AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Internal(e) => {
                tracing::error!("internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
