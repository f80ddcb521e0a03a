//! crates/greenlife_client/src/error.rs

use greenlife_core::ports::PortError;
use thiserror::Error;

/// Errors raised while talking to the API or the local store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl From<ClientError> for PortError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status, message } => match status {
                401 => PortError::Unauthorized,
                403 => PortError::Forbidden,
                404 => PortError::NotFound(message),
                409 => PortError::Conflict(message),
                400..=499 => PortError::Validation(message),
                _ => PortError::Unexpected(message),
            },
            other => PortError::Unexpected(other.to_string()),
        }
    }
}
