//! Error handling for the calculator site server
//!
//! Provides consistent error responses in Swedish and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The built page bundle is missing or unreadable
    #[error("Page bundle unavailable: {0}")]
    BundleUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_sv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", path),
                    message_sv: format!("Sidan {} finns inte", path),
                    path: Some(path.clone()),
                },
            ),
            AppError::BundleUnavailable(path) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "BUNDLE_UNAVAILABLE".to_string(),
                    message_en: "The calculator pages have not been built".to_string(),
                    message_sv: "Kalkylatorsidorna är inte byggda".to_string(),
                    path: Some(path.clone()),
                },
            ),
            AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "IO_ERROR".to_string(),
                    message_en: "A file could not be read".to_string(),
                    message_sv: "En fil kunde inte läsas".to_string(),
                    path: None,
                },
            ),
        };

        // Unknown pages log at debug
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("Error: {:?}", self);
        } else {
            tracing::error!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("/x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BundleUnavailable("dist/index.html".into())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
