//! services/api/src/error.rs
//!
//! Defines the error types for the API service: `ApiError` for startup and
//! infrastructure failures, `HttpError` for failures answered to a client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use greenlife_core::ports::PortError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure while applying the schema migrations.
    #[error("Migration Error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error answered to the client as `{ "error": message }`.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Admin access required")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<PortError> for HttpError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(m) => Self::not_found(m),
            PortError::Conflict(m) => Self::new(StatusCode::CONFLICT, m),
            PortError::Validation(m) => Self::bad_request(m),
            PortError::Unauthorized => Self::unauthorized(),
            PortError::Forbidden => Self::forbidden(),
            PortError::Unexpected(m) => {
                error!("Unexpected service failure: {}", m);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// A convenience alias for handler results.
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_statuses() {
        let cases = [
            (PortError::NotFound("Product not found".into()), StatusCode::NOT_FOUND),
            (PortError::Conflict("User already exists".into()), StatusCode::CONFLICT),
            (PortError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (PortError::Unauthorized, StatusCode::UNAUTHORIZED),
            (PortError::Forbidden, StatusCode::FORBIDDEN),
            (PortError::Unexpected("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError::from(err).status, status);
        }
    }

    #[test]
    fn unexpected_errors_do_not_leak_details() {
        let err = HttpError::from(PortError::Unexpected("connection refused".into()));
        assert_eq!(err.message, "Internal server error");
    }
}
