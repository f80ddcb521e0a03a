//! crates/greenlife_core/src/storefront.rs
//!
//! The shopper's session: who is logged in, the catalog, the cart and the order
//! history. All writes go through `&mut self` methods, so one session can never
//! run two checkouts at once.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::domain::{NewOrder, Order, SessionUser, User};
use crate::ports::{Persistence, PortError, PortResult, StorefrontBackend};

/// Storage key holding the logged-in user and their token.
pub const USER_KEY: &str = "gl_active_user";

/// Why a checkout did not produce an order. In every case the cart and the
/// order history are exactly as they were before the attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Nobody is logged in; the caller should send the shopper to the login flow.
    #[error("Please log in to place an order")]
    AuthenticationRequired,
    #[error("The cart is empty")]
    EmptyCart,
    /// The cart's total does not fit in a `Decimal`.
    #[error("The order total is too large")]
    TotalOutOfRange,
    /// The backend refused the order as submitted.
    #[error("Order rejected: {0}")]
    Rejected(String),
    /// The backend failed or could not be reached. Safe to retry.
    #[error("Order could not be placed: {0}")]
    Backend(String),
}

impl From<PortError> for CheckoutError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Unauthorized | PortError::Forbidden => CheckoutError::AuthenticationRequired,
            PortError::Validation(m) | PortError::Conflict(m) | PortError::NotFound(m) => {
                CheckoutError::Rejected(m)
            }
            PortError::Unexpected(m) => CheckoutError::Backend(m),
        }
    }
}

pub struct Storefront {
    backend: Arc<dyn StorefrontBackend>,
    persistence: Arc<dyn Persistence>,
    user: Option<SessionUser>,
    catalog: Catalog,
    cart: CartStore,
    orders: Vec<Order>,
}

impl Storefront {
    /// Restores the saved user and cart. Neither the catalog nor the order
    /// history is fetched here; call `refresh_catalog` / `refresh_orders`.
    pub fn start(backend: Arc<dyn StorefrontBackend>, persistence: Arc<dyn Persistence>) -> Self {
        let user = match persistence.load(USER_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<SessionUser>(&raw)
                .map_err(|e| warn!("Discarding unreadable saved user: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read saved user: {}", e);
                None
            }
        };
        let cart = CartStore::load(persistence.clone());

        Self {
            backend,
            persistence,
            user,
            catalog: Catalog::default(),
            cart,
            orders: Vec::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_admin)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Order history, newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Reloads the catalog. On failure the previous products are kept.
    pub async fn refresh_catalog(&mut self) -> PortResult<()> {
        match self.backend.fetch_products().await {
            Ok(products) => {
                self.catalog.replace(products);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load products: {}", e);
                Err(e)
            }
        }
    }

    /// Reloads the order history of the logged-in user.
    pub async fn refresh_orders(&mut self) -> PortResult<()> {
        let Some(user_id) = self.user().map(|u| u.id) else {
            self.orders.clear();
            return Ok(());
        };
        self.orders = self.backend.fetch_orders(user_id).await?;
        Ok(())
    }

    /// Logs in and remembers the session. Returns the user so the caller can
    /// route admins to the dashboard.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> PortResult<User> {
        let session = self.backend.login(email, password).await?;
        let user = session.user.clone();
        self.remember(&session);
        self.user = Some(session);

        if let Err(e) = self.refresh_orders().await {
            warn!("Logged in but failed to load order history: {}", e);
        }
        info!("User {} logged in", user.id);
        Ok(user)
    }

    /// Creates an account, then logs into it.
    #[instrument(skip(self, password))]
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> PortResult<User> {
        self.backend.register(name, email, password).await?;
        self.login(email, password).await
    }

    /// Forgets the user and their orders. The cart is kept.
    pub fn logout(&mut self) {
        self.user = None;
        self.orders.clear();
        if let Err(e) = self.persistence.remove(USER_KEY) {
            warn!("Failed to clear saved user: {}", e);
        }
    }

    /// Turns the cart into an order. On success the order is prepended to the
    /// history and the cart is emptied; on any error nothing changes.
    pub async fn checkout(&mut self) -> Result<Order, CheckoutError> {
        let user_id = self
            .user()
            .map(|u| u.id)
            .ok_or(CheckoutError::AuthenticationRequired)?;
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let payload = NewOrder::from_cart(user_id, self.cart.lines())
            .ok_or(CheckoutError::TotalOutOfRange)?;
        info!(
            "Submitting order for user {}: {} item(s), total {}",
            user_id,
            payload.items.len(),
            payload.total
        );

        let order = self.backend.create_order(&payload).await.map_err(|e| {
            warn!("Checkout failed for user {}: {}", user_id, e);
            CheckoutError::from(e)
        })?;

        self.orders.insert(0, order.clone());
        self.cart.clear_cart();
        info!("Order {} placed", order.id);
        Ok(order)
    }

    fn remember(&self, session: &SessionUser) {
        let result = serde_json::to_string(session)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.persistence
                    .save(USER_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!("Failed to save session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CART_KEY;
    use crate::domain::{OrderStatus, Product};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    /// Records every order it is asked to create and can be told to fail.
    #[derive(Default)]
    struct FakeBackend {
        submitted: Mutex<Vec<NewOrder>>,
        failure: Mutex<Option<PortError>>,
        user: Mutex<Option<User>>,
    }

    impl FakeBackend {
        fn failing(err: PortError) -> Self {
            let backend = Self::default();
            *backend.failure.lock() = Some(err);
            backend
        }

        fn submissions(&self) -> usize {
            self.submitted.lock().len()
        }
    }

    #[async_trait]
    impl StorefrontBackend for FakeBackend {
        async fn login(&self, email: &str, password: &str) -> PortResult<SessionUser> {
            if password != "secret" {
                return Err(PortError::Unauthorized);
            }
            let user = User {
                id: Uuid::new_v4(),
                name: "Shopper".to_string(),
                email: email.to_string(),
                is_admin: false,
            };
            *self.user.lock() = Some(user.clone());
            Ok(SessionUser {
                user,
                token: "token-1".to_string(),
            })
        }

        async fn register(&self, name: &str, email: &str, _password: &str) -> PortResult<User> {
            Ok(User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                is_admin: false,
            })
        }

        async fn fetch_products(&self) -> PortResult<Vec<Product>> {
            Ok(vec![product("1", "4.99"), product("3", "12.99")])
        }

        async fn fetch_orders(&self, _user_id: Uuid) -> PortResult<Vec<Order>> {
            Ok(Vec::new())
        }

        async fn create_order(&self, order: &NewOrder) -> PortResult<Order> {
            if let Some(err) = self.failure.lock().clone() {
                return Err(err);
            }
            self.submitted.lock().push(order.clone());
            Ok(Order {
                id: Uuid::new_v4(),
                user_id: order.user_id,
                items: order.items.clone(),
                total: order.total,
                status: OrderStatus::Pending,
                created_at: Utc::now(),
            })
        }
    }

    fn product(name: &str, price: &str) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            price: price.parse().unwrap(),
            description: String::new(),
            category: "Fruits".to_string(),
            image: String::new(),
            stock: 5,
            is_new: false,
            is_best_seller: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn logged_in_store() -> Arc<MemoryStore> {
        let session = SessionUser {
            user: User {
                id: Uuid::new_v4(),
                name: "Shopper".to_string(),
                email: "shopper@example.com".to_string(),
                is_admin: false,
            },
            token: "token-0".to_string(),
        };
        Arc::new(MemoryStore::new().with_entry(USER_KEY, &serde_json::to_string(&session).unwrap()))
    }

    fn fill_cart(shop: &mut Storefront) {
        let avocado = product("1", "4.99");
        let quinoa = product("3", "12.99");
        shop.cart_mut().add_to_cart(&avocado);
        shop.cart_mut().add_to_cart(&avocado);
        shop.cart_mut().add_to_cart(&quinoa);
    }

    #[tokio::test]
    async fn checkout_places_order_and_empties_cart() {
        let backend = Arc::new(FakeBackend::default());
        let store = logged_in_store();
        let mut shop = Storefront::start(backend.clone(), store.clone());
        fill_cart(&mut shop);

        let order = shop.checkout().await.unwrap();

        assert_eq!(order.total, Decimal::new(2297, 2));
        assert_eq!(order.items.len(), 2);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.orders().len(), 1);
        assert_eq!(shop.orders()[0].total, Decimal::new(2297, 2));
        assert_eq!(store.get(CART_KEY).as_deref(), Some("[]"));
        assert_eq!(backend.submitted.lock()[0].total, Decimal::new(2297, 2));
    }

    #[tokio::test]
    async fn new_orders_are_prepended() {
        let backend = Arc::new(FakeBackend::default());
        let mut shop = Storefront::start(backend, logged_in_store());

        fill_cart(&mut shop);
        let first = shop.checkout().await.unwrap();
        shop.cart_mut().add_to_cart(&product("5", "8.49"));
        let second = shop.checkout().await.unwrap();

        let ids: Vec<Uuid> = shop.orders().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn empty_cart_never_reaches_the_backend() {
        let backend = Arc::new(FakeBackend::default());
        let mut shop = Storefront::start(backend.clone(), logged_in_store());

        let err = shop.checkout().await.unwrap_err();

        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(backend.submissions(), 0);
        assert!(shop.orders().is_empty());
    }

    #[tokio::test]
    async fn overflowing_total_never_reaches_the_backend() {
        let backend = Arc::new(FakeBackend::default());
        let mut shop = Storefront::start(backend.clone(), logged_in_store());
        let mut pricey = product("9", "1.00");
        pricey.price = Decimal::MAX;
        shop.cart_mut().add_to_cart(&pricey);
        shop.cart_mut().add_to_cart(&pricey);

        let err = shop.checkout().await.unwrap_err();

        assert_eq!(err, CheckoutError::TotalOutOfRange);
        assert_eq!(backend.submissions(), 0);
        assert_eq!(shop.cart().cart_count(), 2);
    }

    #[tokio::test]
    async fn checkout_without_user_requires_authentication() {
        let backend = Arc::new(FakeBackend::default());
        let mut shop = Storefront::start(backend.clone(), Arc::new(MemoryStore::new()));
        fill_cart(&mut shop);

        let err = shop.checkout().await.unwrap_err();

        assert_eq!(err, CheckoutError::AuthenticationRequired);
        assert_eq!(backend.submissions(), 0);
        assert_eq!(shop.cart().cart_count(), 3);
    }

    #[tokio::test]
    async fn backend_failure_leaves_state_for_a_retry() {
        let backend = Arc::new(FakeBackend::failing(PortError::Unexpected(
            "Internal server error".to_string(),
        )));
        let mut shop = Storefront::start(backend.clone(), logged_in_store());
        fill_cart(&mut shop);
        let before = shop.cart().lines().to_vec();

        let err = shop.checkout().await.unwrap_err();
        assert!(matches!(err, CheckoutError::Backend(_)));
        assert_eq!(shop.cart().lines(), before.as_slice());
        assert!(shop.orders().is_empty());

        *backend.failure.lock() = None;
        let order = shop.checkout().await.unwrap();
        assert_eq!(order.total, Decimal::new(2297, 2));
        assert!(shop.cart().is_empty());
    }

    #[tokio::test]
    async fn validation_failure_is_reported_as_rejected() {
        let backend = Arc::new(FakeBackend::failing(PortError::Validation(
            "User ID, items, and total are required".to_string(),
        )));
        let mut shop = Storefront::start(backend, logged_in_store());
        fill_cart(&mut shop);

        let err = shop.checkout().await.unwrap_err();
        assert_eq!(
            err,
            CheckoutError::Rejected("User ID, items, and total are required".to_string())
        );
        assert_eq!(shop.cart().cart_count(), 3);
    }

    #[tokio::test]
    async fn login_persists_session_and_logout_keeps_cart() {
        let backend = Arc::new(FakeBackend::default());
        let store = Arc::new(MemoryStore::new());
        let mut shop = Storefront::start(backend, store.clone());
        fill_cart(&mut shop);

        assert_eq!(
            shop.login("shopper@example.com", "wrong").await.unwrap_err(),
            PortError::Unauthorized
        );
        assert!(shop.user().is_none());

        let user = shop.login("shopper@example.com", "secret").await.unwrap();
        assert_eq!(shop.token(), Some("token-1"));
        assert!(store.get(USER_KEY).unwrap().contains(&user.id.to_string()));

        shop.logout();
        assert!(shop.user().is_none());
        assert!(store.get(USER_KEY).is_none());
        assert_eq!(shop.cart().cart_count(), 3);
    }

    #[tokio::test]
    async fn corrupt_saved_user_starts_logged_out() {
        let store = Arc::new(MemoryStore::new().with_entry(USER_KEY, "not json"));
        let shop = Storefront::start(Arc::new(FakeBackend::default()), store);
        assert!(shop.user().is_none());
    }

    #[tokio::test]
    async fn refresh_catalog_loads_products() {
        let mut shop = Storefront::start(
            Arc::new(FakeBackend::default()),
            Arc::new(MemoryStore::new()),
        );
        shop.refresh_catalog().await.unwrap();
        assert_eq!(shop.catalog().products().len(), 2);
    }
}
