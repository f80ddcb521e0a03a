//! services/api/src/web/orders.rs
//!
//! Order placement and per-user order history.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use greenlife_core::domain::{order_total, NewOrder, Order, OrderItem, OrderStatus, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpError, HttpResult};
use crate::web::extract::{parse_id, JsonBody};
use crate::web::state::AppState;

const MISSING_ORDER_FIELDS: &str = "User ID, items, and total are required";
const TOTAL_OUT_OF_RANGE: &str = "Order total is out of range";

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Option<Uuid>,
    pub items: Option<Vec<OrderItem>>,
    #[schema(value_type = Option<f64>)]
    pub total: Option<Decimal>,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> HttpResult<NewOrder> {
        match (self.user_id, self.items, self.total) {
            (Some(user_id), Some(items), Some(total)) if !items.is_empty() => Ok(NewOrder {
                user_id,
                items,
                total,
            }),
            _ => Err(HttpError::bad_request(MISSING_ORDER_FIELDS)),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct OrderResponse {
    pub order: Order,
}

/// An order item with the product as it currently appears in the catalog.
#[derive(Serialize, ToSchema)]
pub struct PopulatedOrderItem {
    #[serde(flatten)]
    pub item: OrderItem,
    /// `null` once the product has been removed from the catalog.
    pub product: Option<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<PopulatedOrderItem>,
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl PopulatedOrder {
    fn new(order: Order, catalog: &HashMap<Uuid, Product>) -> Self {
        let items = order
            .items
            .into_iter()
            .map(|item| PopulatedOrderItem {
                product: catalog.get(&item.product_id).cloned(),
                item,
            })
            .collect();
        Self {
            id: order.id,
            user_id: order.user_id,
            items,
            total: order.total,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserOrdersResponse {
    pub orders: Vec<PopulatedOrder>,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/orders - Place an order
///
/// The submitted total is stored as sent.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Missing user ID, items, or total, or item amounts out of range", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn create_order_handler(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> HttpResult<impl IntoResponse> {
    let new_order = req.into_new_order()?;

    let computed =
        order_total(&new_order.items).ok_or_else(|| HttpError::bad_request(TOTAL_OUT_OF_RANGE))?;
    if computed != new_order.total {
        debug!(
            "Order total {} for user {} differs from item sum {}",
            new_order.total, new_order.user_id, computed
        );
    }

    let order = state.db.create_order(new_order).await?;
    info!("Created order {} for user {}", order.id, order.user_id);
    Ok((StatusCode::CREATED, Json(OrderResponse { order })))
}

/// GET /api/orders/user/{user_id} - A user's orders, newest first
#[utoipa::path(
    get,
    path = "/api/orders/user/{user_id}",
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's orders", body = UserOrdersResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn user_orders_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> HttpResult<Json<UserOrdersResponse>> {
    let user_id = parse_id(&user_id, "user")?;
    let orders = state.db.list_orders_by_user(user_id).await?;
    let catalog: HashMap<Uuid, Product> = state
        .db
        .list_products()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let orders = orders
        .into_iter()
        .map(|order| PopulatedOrder::new(order, &catalog))
        .collect();
    Ok(Json(UserOrdersResponse { orders }))
}
