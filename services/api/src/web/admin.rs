//! services/api/src/web/admin.rs
//!
//! Admin panel endpoints: product and category management, inventory stats,
//! and the full order list. Every route here sits behind `require_admin`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use greenlife_core::domain::{
    Category, CategoryDraft, Order, Product, ProductDraft, ProductPatch, ProductStats,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpError, HttpResult};
use crate::web::auth::MessageResponse;
use crate::web::extract::{parse_id, JsonBody};
use crate::web::products::{ProductListResponse, ProductResponse};
use crate::web::state::{AppState, AuthUser};

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub stats: ProductStats,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

#[derive(Serialize, ToSchema)]
pub struct CategoryResponse {
    pub category: Category,
}

#[derive(Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

//=========================================================================================
// Products
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products", body = ProductListResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn admin_list_products_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<ProductListResponse>> {
    let products = state.db.list_products().await?;
    Ok(Json(ProductListResponse { products }))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductDraft,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Name and price are required", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn create_product_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> HttpResult<impl IntoResponse> {
    let new_product = draft.validate().map_err(HttpError::bad_request)?;
    let product = state.db.create_product(new_product).await?;
    info!("Admin {} created product {}", auth.user_id, product.id);
    Ok((StatusCode::CREATED, Json(ProductResponse { product })))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, patch))]
pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> HttpResult<Json<ProductResponse>> {
    let product_id = parse_id(&id, "product")?;
    let product = state.db.update_product(product_id, patch).await?;
    Ok(Json(ProductResponse { product }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state))]
pub async fn delete_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Json<MessageResponse>> {
    let product_id = parse_id(&id, "product")?;
    state.db.delete_product(product_id).await?;
    info!("Deleted product {}", product_id);
    Ok(message("Product deleted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Inventory figures", body = StatsResponse)
    ),
    security(("bearer" = []))
)]
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> HttpResult<Json<StatsResponse>> {
    let products = state.db.list_products().await?;
    Ok(Json(StatsResponse {
        stats: ProductStats::from_products(&products),
    }))
}

//=========================================================================================
// Categories
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "All categories, sorted by name", body = CategoryListResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<CategoryListResponse>> {
    let categories = state.db.list_categories().await?;
    Ok(Json(CategoryListResponse { categories }))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryDraft,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Category name is required", body = ErrorResponse),
        (status = 409, description = "Category already exists", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip_all)]
pub async fn create_category_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(draft): JsonBody<CategoryDraft>,
) -> HttpResult<impl IntoResponse> {
    let new_category = draft.validate().map_err(HttpError::bad_request)?;
    let category = state.db.create_category(new_category).await?;
    info!("Created category '{}'", category.name);
    Ok((StatusCode::CREATED, Json(CategoryResponse { category })))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    request_body = CategoryDraft,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Category name is required", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 409, description = "Name taken by another category", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, draft))]
pub async fn update_category_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    JsonBody(draft): JsonBody<CategoryDraft>,
) -> HttpResult<Json<CategoryResponse>> {
    let category_id = parse_id(&id, "category")?;
    let update = draft.validate().map_err(HttpError::bad_request)?;
    let category = state.db.update_category(category_id, update).await?;
    Ok(Json(CategoryResponse { category }))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state))]
pub async fn delete_category_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HttpResult<Json<MessageResponse>> {
    let category_id = parse_id(&id, "category")?;
    state.db.delete_category(category_id).await?;
    Ok(message("Category deleted successfully"))
}

//=========================================================================================
// Orders
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    responses(
        (status = 200, description = "Every order, newest first", body = OrderListResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_orders_handler(
    State(state): State<Arc<AppState>>,
) -> HttpResult<Json<OrderListResponse>> {
    let orders = state.db.list_orders().await?;
    Ok(Json(OrderListResponse { orders }))
}
