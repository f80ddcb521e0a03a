//! services/api/src/web/routes.rs
//!
//! Assembles the full application router.

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::web::{
    admin, auth,
    middleware::{require_admin, require_auth},
    orders, products,
    rest::{health_handler, not_found_handler, ApiDoc},
    state::AppState,
};

/// Builds the router serving `/api`, the Swagger UI, and the 404 fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/products", get(products::list_products_handler))
        .route("/products/{id}", get(products::get_product_handler))
        .route("/orders", post(orders::create_order_handler))
        .route("/orders/user/{user_id}", get(orders::user_orders_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Admin routes (auth + admin flag required)
    let admin_routes = Router::new()
        .route(
            "/products",
            get(admin::admin_list_products_handler).post(admin::create_product_handler),
        )
        .route(
            "/products/{id}",
            put(admin::update_product_handler).delete(admin::delete_product_handler),
        )
        .route("/stats", get(admin::stats_handler))
        .route(
            "/categories",
            get(admin::list_categories_handler).post(admin::create_category_handler),
        )
        .route(
            "/categories/{id}",
            put(admin::update_category_handler).delete(admin::delete_category_handler),
        )
        .route("/orders", get(admin::list_orders_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
