//! Order handlers: listings, details, status transitions and receipts.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db;
use crate::models::{Order, OrderItemDetail, OrderStatus, OrderSummary, Receipt};

use super::error::{AppError, AppResult};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub restaurant_id: Option<i64>,
}

/// GET /admin/orders[?restaurant_id=] — newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OrdersQuery>,
) -> AppResult<Json<Vec<OrderSummary>>> {
    Ok(Json(
        db::list_orders(&state.pool, query.restaurant_id).await?,
    ))
}

/// GET /admin/recent-orders — the last three, for the dashboard.
pub async fn recent(State(state): State<AppState>) -> AppResult<Json<Vec<OrderSummary>>> {
    Ok(Json(db::list_recent_orders(&state.pool).await?))
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
    pub receipt: Option<Receipt>,
}

/// GET /admin/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let order = db::get_order(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    let items = db::list_order_items(&state.pool, id).await?;
    let receipt = db::get_receipt_by_order(&state.pool, id).await?;
    Ok(Json(OrderDetail {
        order,
        items,
        receipt,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /admin/orders/{id}/status — only the `paid` transition stamps
/// `paid_at`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<Json<Value>> {
    if !db::update_order_status(&state.pool, id, update.status).await? {
        return Err(AppError::NotFound("Order"));
    }
    Ok(Json(json!({
        "message": format!("Order {id} status updated")
    })))
}

#[derive(Debug, Deserialize)]
pub struct ReceiptInput {
    pub file_path: String,
}

/// POST /admin/orders/{id}/receipt
pub async fn attach_receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ReceiptInput>,
) -> AppResult<Json<Receipt>> {
    db::get_order(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Order"))?;
    db::attach_receipt(&state.pool, id, &input.file_path).await?;
    let receipt = db::get_receipt_by_order(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound("Receipt"))?;
    Ok(Json(receipt))
}
