//! Order API Handlers
//!
//! Thin HTTP layer over the order manager; every business rule lives
//! behind [`crate::orders::OrderManager`].

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orders::OrderPreview;
use crate::utils::AppResult;
use shared::order::{Order, OrderCreate, OrderStatus, OrderUpdate};

/// GET /api/orders - every order, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_orders().await?;
    Ok(Json(orders))
}

/// GET /api/orders/active - orders still moving through the lifecycle
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_active().await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get_order(id).await?;
    Ok(Json(order))
}

/// POST /api/orders - create a pending order with server-side price snapshots
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.create_order(payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/preview - price a payload without persisting it
pub async fn preview(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderPreview>> {
    let preview = state.orders.preview(payload).await?;
    Ok(Json(preview))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub discount_id: Option<i64>,
}

/// GET /api/orders/:id/preview?discount_id= - re-price an existing order,
/// optionally with a different discount, without persisting
pub async fn preview_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PreviewQuery>,
) -> AppResult<Json<OrderPreview>> {
    let preview = state.orders.preview_order(id, query.discount_id).await?;
    Ok(Json(preview))
}

/// PUT /api/orders/:id - edit a pending order
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let order = state.orders.update_order(id, payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/confirm - reserve the discount and confirm
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.confirm_order(id).await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: OrderStatus,
}

/// POST /api/orders/:id/status - move the order along the state machine
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> AppResult<Json<Order>> {
    let order = state.orders.set_status(id, payload.status).await?;
    Ok(Json(order))
}
