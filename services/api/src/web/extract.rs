//! services/api/src/web/extract.rs
//!
//! Request extractors that answer bad input with the API's JSON error body
//! instead of axum's plain-text rejections.

use axum::extract::{rejection::JsonRejection, FromRequest};
use uuid::Uuid;

use crate::error::{HttpError, HttpResult};

/// `axum::Json`, but a malformed body becomes a 400 `{ "error": ... }`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(HttpError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::bad_request(rejection.body_text())
    }
}

/// Parses an id taken from the URL path.
pub fn parse_id(raw: &str, what: &str) -> HttpResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| HttpError::bad_request(format!("Invalid {} ID", what)))
}
