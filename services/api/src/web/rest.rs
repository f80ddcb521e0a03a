//! services/api/src/web/rest.rs
//!
//! Contains the health check handler and the master definition for the
//! OpenAPI specification.

use axum::Json;
use greenlife_core::domain::{
    Category, CategoryDraft, Order, OrderItem, OrderStatus, Product, ProductDraft, ProductPatch,
    ProductStats, User,
};
use serde::Serialize;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

use crate::error::{ErrorResponse, HttpError};
use crate::web::{admin, auth, orders, products};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        products::list_products_handler,
        products::get_product_handler,
        orders::create_order_handler,
        orders::user_orders_handler,
        admin::admin_list_products_handler,
        admin::create_product_handler,
        admin::update_product_handler,
        admin::delete_product_handler,
        admin::stats_handler,
        admin::list_categories_handler,
        admin::create_category_handler,
        admin::update_category_handler,
        admin::delete_category_handler,
        admin::list_orders_handler,
    ),
    components(
        schemas(
            HealthResponse, ErrorResponse, User, Product, ProductDraft, ProductPatch,
            ProductStats, Category, CategoryDraft, Order, OrderItem, OrderStatus,
            auth::RegisterRequest, auth::LoginRequest, auth::UserResponse,
            auth::LoginResponse, auth::MessageResponse,
            products::ProductListResponse, products::ProductResponse,
            orders::CreateOrderRequest, orders::OrderResponse, orders::PopulatedOrder,
            orders::PopulatedOrderItem, orders::UserOrdersResponse,
            admin::StatsResponse, admin::CategoryListResponse, admin::CategoryResponse,
            admin::OrderListResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "GreenLife Storefront API", description = "Catalog, accounts, orders, and the admin panel of the GreenLife grocery store.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme the protected paths refer to.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

//=========================================================================================
// Health and Fallback
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// GET /api/health - Liveness check
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "The server is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "GreenLife API is running".to_string(),
    })
}

/// Answers any unmatched route.
pub async fn not_found_handler() -> HttpError {
    HttpError::not_found("Route not found")
}
