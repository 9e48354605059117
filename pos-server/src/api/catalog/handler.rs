//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{category, product};
use crate::utils::{AppError, AppResult};
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, Product, ProductCreate, ProductUpdate,
};

/// GET /api/categories
pub async fn list_categories(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id
pub async fn get_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let c = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;
    Ok(Json(c))
}

/// GET /api/categories/:id/products
pub async fn list_category_products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_by_category(&state.pool, id).await?;
    Ok(Json(products))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let c = category::create(&state.pool, payload).await?;
    Ok(Json(c))
}

/// PUT /api/categories/:id
pub async fn update_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let c = category::update(&state.pool, id, payload).await?;
    Ok(Json(c))
}

/// DELETE /api/categories/:id - blocked while products remain
pub async fn delete_category(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = category::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Category {id} not found")));
    }
    Ok(Json(true))
}

/// GET /api/products
pub async fn list_products(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let p = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;
    Ok(Json(p))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let p = product::create(&state.pool, payload).await?;
    Ok(Json(p))
}

/// PUT /api/products/:id
pub async fn update_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let p = product::update(&state.pool, id, payload).await?;
    Ok(Json(p))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = product::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Product {id} not found")));
    }
    Ok(Json(true))
}
