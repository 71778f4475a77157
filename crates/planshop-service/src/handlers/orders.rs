//! Order ledger handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use planshop_core::{Order, OrderId};
use planshop_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Maximum number of order records scanned per listing request.
const MAX_ORDER_SCAN: usize = 1000;

/// Order response.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// Order ID.
    pub id: String,
    /// Purchasing user's email, if known.
    pub user_email: Option<String>,
    /// Purchased plan id.
    pub plan_id: String,
    /// Amount in cents.
    pub amount_cents: i64,
    /// Amount formatted as dollars.
    pub amount_formatted: String,
    /// Currency code.
    pub currency: String,
    /// Order status.
    pub status: planshop_core::OrderStatus,
    /// Checkout session that produced this order, if any.
    pub payment_session_id: Option<String>,
    /// Created timestamp (RFC 3339).
    pub created_at: String,
    /// Updated timestamp (RFC 3339).
    pub updated_at: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            user_email: order.user_email.clone(),
            plan_id: order.plan_id.clone(),
            amount_cents: order.amount_cents,
            amount_formatted: order.amount_formatted(),
            currency: order.currency.clone(),
            status: order.status,
            payment_session_id: order.payment_session_id.clone(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// Create order request.
///
/// Deliberately carries no amount field — the price always comes from the
/// stored plan, so a client cannot tamper with it.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Purchasing user's email, if known.
    pub user_email: Option<String>,
    /// The plan to purchase.
    pub plan_id: String,
}

/// Create a new pending order.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let plan = state
        .catalog
        .find(&body.plan_id)
        .ok_or_else(|| ApiError::NotFound(format!("Subscription plan not found: {}", body.plan_id)))?;

    let order = Order::pending(plan, body.user_email);
    state.store.put_order(&order)?;

    tracing::info!(
        order_id = %order.id,
        plan_id = %order.plan_id,
        amount_cents = %order.amount_cents,
        "Order created"
    );

    Ok(Json(OrderResponse::from(&order)))
}

/// Get order details.
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = OrderId::from_str(&order_id)
        .map_err(|_| ApiError::NotFound(format!("Order not found: {order_id}")))?;

    let order = state
        .store
        .get_order(&order_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {order_id}")))?;

    Ok(Json(OrderResponse::from(&order)))
}

/// Order list query parameters.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    /// Only return orders for this email.
    pub user_email: Option<String>,
}

/// List orders, optionally filtered by user email.
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .store
        .list_orders(query.user_email.as_deref(), MAX_ORDER_SCAN)?;

    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}
