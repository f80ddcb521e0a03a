//! Runs a `Storefront` against the real API router over a local socket.

use api_lib::{
    adapters::MemoryDatabase,
    config::Config,
    web::{build_router, AppState},
};
use greenlife_client::{ClientConfig, FileStore, HttpBackend};
use greenlife_core::{
    CheckoutError, DatabaseService, NewOrder, NewProduct, PortError, Product, Storefront,
    StorefrontBackend,
};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

fn product(name: &str, price: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price: price.parse().unwrap(),
        description: String::new(),
        category: "Pantry".to_string(),
        image: String::new(),
        stock: 20,
        is_new: false,
        is_best_seller: false,
    }
}

/// Serves the API on an ephemeral port with two products in stock.
async fn spawn_api() -> SocketAddr {
    let db = Arc::new(MemoryDatabase::new());
    db.create_product(product("Hass Avocado", "4.99")).await.unwrap();
    db.create_product(product("Organic Quinoa", "12.99")).await.unwrap();

    let app = build_router(Arc::new(AppState::new(db, Config::default())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn backend(addr: SocketAddr) -> Arc<HttpBackend> {
    let config = ClientConfig::new(format!("http://{}/api", addr));
    Arc::new(HttpBackend::new(&config).unwrap())
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("greenlife-e2e-{}", Uuid::new_v4()))
}

fn find(storefront: &Storefront, name: &str) -> Product {
    storefront
        .catalog()
        .products()
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .unwrap()
}

#[tokio::test]
async fn shopper_checks_out_and_history_survives_restart() {
    let addr = spawn_api().await;
    let dir = temp_dir();
    let store = Arc::new(FileStore::open(&dir).unwrap());
    let mut storefront = Storefront::start(backend(addr), store);

    storefront.refresh_catalog().await.unwrap();
    let avocado = find(&storefront, "Hass Avocado");
    let quinoa = find(&storefront, "Organic Quinoa");
    storefront.cart_mut().add_to_cart(&avocado);
    storefront.cart_mut().add_to_cart(&avocado);
    storefront.cart_mut().add_to_cart(&quinoa);

    assert_eq!(
        storefront.checkout().await.unwrap_err(),
        CheckoutError::AuthenticationRequired
    );
    assert_eq!(storefront.cart().cart_count(), 3);

    storefront
        .register("Ada", "ada@greenlife.test", "hunter22")
        .await
        .unwrap();
    let order = storefront.checkout().await.unwrap();
    assert_eq!(order.total, "22.97".parse::<Decimal>().unwrap());
    assert_eq!(order.items.len(), 2);
    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.orders().len(), 1);

    // A fresh session over the same directory picks up the saved user.
    let store = Arc::new(FileStore::open(&dir).unwrap());
    let mut restarted = Storefront::start(backend(addr), store);
    assert_eq!(
        restarted.user().map(|u| u.email.as_str()),
        Some("ada@greenlife.test")
    );
    assert!(restarted.cart().is_empty());
    restarted.refresh_orders().await.unwrap();
    assert_eq!(restarted.orders().len(), 1);
    assert_eq!(restarted.orders()[0].id, order.id);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn api_errors_surface_as_port_errors() {
    let addr = spawn_api().await;
    let backend = backend(addr);

    backend
        .register("Ada", "ada@greenlife.test", "hunter22")
        .await
        .unwrap();
    assert_eq!(
        backend
            .register("Ada", "ada@greenlife.test", "hunter22")
            .await
            .unwrap_err(),
        PortError::Conflict("User already exists".to_string())
    );
    assert_eq!(
        backend
            .login("ada@greenlife.test", "wrong")
            .await
            .unwrap_err(),
        PortError::Unauthorized
    );

    let empty = NewOrder {
        user_id: Uuid::new_v4(),
        items: Vec::new(),
        total: Decimal::ZERO,
    };
    assert_eq!(
        backend.create_order(&empty).await.unwrap_err(),
        PortError::Validation("User ID, items, and total are required".to_string())
    );
}

#[tokio::test]
async fn unreachable_api_leaves_the_cart_alone() {
    let addr = spawn_api().await;
    let dir = temp_dir();
    let store = Arc::new(FileStore::open(&dir).unwrap());
    let mut storefront = Storefront::start(backend(addr), store.clone());
    storefront.refresh_catalog().await.unwrap();
    storefront
        .register("Ada", "ada@greenlife.test", "hunter22")
        .await
        .unwrap();
    let avocado = find(&storefront, "Hass Avocado");
    storefront.cart_mut().add_to_cart(&avocado);

    // Nothing listens on a port whose listener was just dropped.
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let mut offline = Storefront::start(backend(closed), store);
    assert_eq!(offline.cart().cart_count(), 1);

    let err = offline.checkout().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Backend(_)));
    assert_eq!(offline.cart().cart_count(), 1);
    assert!(offline.orders().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}
