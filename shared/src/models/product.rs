//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity (món ăn)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in whole currency units (VND)
    pub price: f64,
    pub category_id: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    /// Availability derived from ingredient stock; unavailable products
    /// can still exist on old orders but cannot be added or granted
    pub is_available: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: i64,
    pub image_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub is_available: Option<bool>,
}
