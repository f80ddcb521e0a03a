//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{HttpError, HttpResult};
use crate::web::state::{AppState, AuthUser};

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> HttpResult<AuthUser> {
    let token = bearer_token(headers).ok_or_else(HttpError::unauthorized)?;
    let user_id = state.db.validate_auth_session(token).await.map_err(|e| {
        debug!("Rejected bearer token: {:?}", e);
        HttpError::unauthorized()
    })?;
    Ok(AuthUser {
        user_id,
        token: token.to_string(),
    })
}

/// Middleware that validates the bearer token and records the caller.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> HttpResult<Response> {
    let auth = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

/// Like `require_auth`, but the caller must also be an admin (403 otherwise).
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> HttpResult<Response> {
    let auth = authenticate(&state, req.headers()).await?;
    let user = state.db.get_user_by_id(auth.user_id).await.map_err(|e| {
        error!("Failed to load user {} for admin check: {:?}", auth.user_id, e);
        HttpError::unauthorized()
    })?;
    if !user.is_admin {
        return Err(HttpError::forbidden());
    }
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
