//! crates/greenlife_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the storefront.
//! The API implements `DatabaseService`; the storefront session depends only on
//! `Persistence` and `StorefrontBackend`, so both can be swapped in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Category, NewCategory, NewOrder, NewProduct, Order, Product, ProductPatch, SessionUser, User,
    UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Server-side Ports
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users ---
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, name: &str, email: &str, hashed_password: &str)
        -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn create_auth_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owner of a live token; expired or unknown tokens are `Unauthorized`.
    async fn validate_auth_session(&self, token: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, token: &str) -> PortResult<()>;

    // --- Catalog ---
    async fn list_products(&self) -> PortResult<Vec<Product>>;

    async fn get_product(&self, product_id: Uuid) -> PortResult<Product>;

    async fn create_product(&self, product: NewProduct) -> PortResult<Product>;

    async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> PortResult<Product>;

    async fn delete_product(&self, product_id: Uuid) -> PortResult<()>;

    // --- Categories ---
    /// Categories sorted by name.
    async fn list_categories(&self) -> PortResult<Vec<Category>>;

    async fn create_category(&self, category: NewCategory) -> PortResult<Category>;

    async fn update_category(&self, category_id: Uuid, category: NewCategory)
        -> PortResult<Category>;

    async fn delete_category(&self, category_id: Uuid) -> PortResult<()>;

    // --- Orders ---
    /// Stores the order as given. The total is not recomputed.
    async fn create_order(&self, order: NewOrder) -> PortResult<Order>;

    /// Orders for one user, newest first.
    async fn list_orders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Order>>;

    async fn list_orders(&self) -> PortResult<Vec<Order>>;
}

//=========================================================================================
// Client-side Ports
//=========================================================================================

/// Durable key-value storage for the storefront session (the cart and the
/// logged-in user). Calls are synchronous; every cart mutation writes through.
pub trait Persistence: Send + Sync {
    fn load(&self, key: &str) -> PortResult<Option<String>>;

    fn save(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}

/// The storefront's view of the REST API.
#[async_trait]
pub trait StorefrontBackend: Send + Sync {
    /// Invalid credentials are reported as `Unauthorized`.
    async fn login(&self, email: &str, password: &str) -> PortResult<SessionUser>;

    async fn register(&self, name: &str, email: &str, password: &str) -> PortResult<User>;

    async fn fetch_products(&self) -> PortResult<Vec<Product>>;

    async fn fetch_orders(&self, user_id: Uuid) -> PortResult<Vec<Order>>;

    async fn create_order(&self, order: &NewOrder) -> PortResult<Order>;
}
