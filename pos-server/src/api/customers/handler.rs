//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{customer, customer_tier};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Customer, CustomerCreate, CustomerTier, CustomerTierCreate, CustomerTierUpdate, CustomerUpdate,
};

/// GET /api/customers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = customer::find_all(&state.pool).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let c = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {id} not found")))?;
    Ok(Json(c))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    let c = customer::create(&state.pool, payload).await?;
    Ok(Json(c))
}

/// PUT /api/customers/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let c = customer::update(&state.pool, id, payload).await?;
    Ok(Json(c))
}

/// GET /api/customer-tiers - tiers by ascending threshold
pub async fn list_tiers(State(state): State<ServerState>) -> AppResult<Json<Vec<CustomerTier>>> {
    let tiers = customer_tier::find_all(&state.pool).await?;
    Ok(Json(tiers))
}

/// GET /api/customer-tiers/:id
pub async fn get_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerTier>> {
    let t = customer_tier::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer tier {id} not found")))?;
    Ok(Json(t))
}

/// POST /api/customer-tiers
pub async fn create_tier(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerTierCreate>,
) -> AppResult<Json<CustomerTier>> {
    let t = customer_tier::create(&state.pool, payload).await?;
    Ok(Json(t))
}

/// PUT /api/customer-tiers/:id
pub async fn update_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerTierUpdate>,
) -> AppResult<Json<CustomerTier>> {
    let t = customer_tier::update(&state.pool, id, payload).await?;
    Ok(Json(t))
}

/// DELETE /api/customer-tiers/:id - blocked while customers hold the tier
pub async fn delete_tier(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = customer_tier::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Customer tier {id} not found")));
    }
    Ok(Json(true))
}
