//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use greenlife_core::domain::User;
use greenlife_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpError, HttpResult};
use crate::web::extract::JsonBody;
use crate::web::state::{AppState, AuthUser};

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub user: User,
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn token_expiry(now: DateTime<Utc>, ttl: Duration) -> Option<DateTime<Utc>> {
    now.checked_add_signed(ttl)
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a new account
///
/// New accounts are never admins; that flag is only set in the database.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> HttpResult<impl IntoResponse> {
    let (Some(name), Some(email), Some(password)) =
        (required(req.name), required(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(HttpError::bad_request("Name, email, and password are required"));
    };

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            HttpError::internal()
        })?
        .to_string();

    // 2. Create user in database
    let user = state.db.create_user(&name, &email, &password_hash).await?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// POST /api/auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> HttpResult<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (required(req.email), req.password.filter(|p| !p.is_empty()))
    else {
        return Err(HttpError::bad_request("Email and password are required"));
    };
    let invalid = || HttpError::new(StatusCode::UNAUTHORIZED, "Invalid email or password");

    // 1. Get user by email
    let creds = state.db.get_user_by_email(&email).await.map_err(|e| match e {
        PortError::NotFound(_) => invalid(),
        other => HttpError::from(other),
    })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        HttpError::internal()
    })?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(invalid());
    }

    // 3. Issue a token
    let token = Uuid::new_v4().to_string();
    let expires_at = token_expiry(Utc::now(), state.config.token_ttl).ok_or_else(|| {
        error!("Token lifetime {:?} overflows the clock", state.config.token_ttl);
        HttpError::internal()
    })?;
    state
        .db
        .create_auth_session(&token, creds.user.id, expires_at)
        .await?;
    info!("User {} logged in", creds.user.id);

    Ok(Json(LoginResponse {
        user: creds.user,
        token,
    }))
}

/// POST /api/auth/logout - Invalidate the caller's token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "No active session", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> HttpResult<Json<MessageResponse>> {
    state.db.delete_auth_session(&auth.token).await?;
    info!("User {} logged out", auth.user_id);
    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}
