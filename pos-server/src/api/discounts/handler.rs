//! Discount API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::discount;
use crate::utils::{AppError, AppResult};
use shared::models::{Discount, DiscountCreate, DiscountUpdate};

/// GET /api/discounts - all discounts, newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Discount>>> {
    let discounts = discount::find_all(&state.pool).await?;
    Ok(Json(discounts))
}

/// GET /api/discounts/active - discounts redeemable right now
pub async fn list_active(State(state): State<ServerState>) -> AppResult<Json<Vec<Discount>>> {
    let now = shared::util::now_millis();
    let discounts = discount::find_active(&state.pool, now).await?;
    Ok(Json(discounts))
}

/// GET /api/discounts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Discount>> {
    let d = discount::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Discount {id} not found")))?;
    Ok(Json(d))
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub order_id: Option<i64>,
}

/// GET /api/discounts/validate/:code?order_id= - resolve a redemption code
///
/// With `order_id` the full eligibility filter runs against that order;
/// without it only the structural gates apply.
pub async fn validate_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(query): Query<ValidateQuery>,
) -> AppResult<Json<Discount>> {
    let d = state.orders.validate_code(&code, query.order_id).await?;
    Ok(Json(d))
}

/// POST /api/discounts
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<Json<Discount>> {
    let d = discount::create(&state.pool, payload).await?;
    Ok(Json(d))
}

/// PUT /api/discounts/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountUpdate>,
) -> AppResult<Json<Discount>> {
    let d = discount::update(&state.pool, id, payload).await?;
    Ok(Json(d))
}

/// DELETE /api/discounts/:id - blocked while completed orders reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = discount::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Discount {id} not found")));
    }
    Ok(Json(true))
}
