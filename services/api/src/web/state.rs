//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use greenlife_core::ports::DatabaseService;
use std::sync::Arc;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

//=========================================================================================
// AuthUser (Per Request)
//=========================================================================================

/// The caller identified by a bearer token. Inserted into the request
/// extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub token: String,
}
