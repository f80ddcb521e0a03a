//! services/api/src/web/products.rs
//!
//! Public, read-only catalog endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use greenlife_core::domain::Product;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpResult};
use crate::web::extract::parse_id;
use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductResponse {
    pub product: Product,
}

/// GET /api/products - The whole catalog, newest first
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = ProductListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<ProductListResponse>> {
    let products = state.db.list_products().await?;
    Ok(Json(ProductListResponse { products }))
}

/// GET /api/products/{id} - A single product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Json<ProductResponse>> {
    let product_id = parse_id(&id, "product")?;
    let product = state.db.get_product(product_id).await?;
    Ok(Json(ProductResponse { product }))
}
