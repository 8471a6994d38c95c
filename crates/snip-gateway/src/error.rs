use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::StorageError;
use snip_redirector::RedirectorError;
use snip_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// Everything a handler can fail with, each mapped onto one HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("{0}")]
    Validation(String),
    #[error("short code not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    /// Store trouble. `public` is what the client sees, `source` stays in the logs.
    #[error("{public}")]
    Storage {
        public: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidBody | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        match error {
            ShortenerError::InvalidUrl(reason) => AppError::Validation(reason),
            ShortenerError::Storage(source) => AppError::Storage {
                public: "Database error",
                source,
            },
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(error: RedirectorError) -> Self {
        match error {
            RedirectorError::NotFound(_) => AppError::NotFound,
            RedirectorError::Storage(source) => AppError::Storage {
                public: "Error retrieving URL",
                source,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Storage { public, source } = &self {
            error!(error = %source, "{public}");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortener_errors_map_to_status() {
        let validation: AppError = ShortenerError::InvalidUrl("URL is required".into()).into();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.to_string(), "URL is required");

        let storage: AppError =
            ShortenerError::Storage(StorageError::Timeout("insert".into())).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.to_string(), "Database error");
    }

    #[test]
    fn redirector_errors_map_to_status() {
        let missing: AppError = RedirectorError::NotFound("abc".into()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let storage: AppError =
            RedirectorError::Storage(StorageError::Unavailable("down".into())).into();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.to_string(), "Error retrieving URL");
    }
}
