//! Customer Tier Model

use serde::{Deserialize, Serialize};

/// Customer tier entity (hạng thành viên)
///
/// A customer's effective tier is the tier with the highest
/// `minimum_spent` that does not exceed the customer's lifetime spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CustomerTier {
    pub id: i64,
    pub name: String,
    /// Lifetime-spend threshold to reach this tier
    pub minimum_spent: f64,
    /// Display only
    pub color_hex: Option<String>,
    pub display_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create customer tier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerTierCreate {
    pub name: String,
    pub minimum_spent: f64,
    pub color_hex: Option<String>,
    pub display_order: Option<i64>,
}

/// Update customer tier payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerTierUpdate {
    pub name: Option<String>,
    pub minimum_spent: Option<f64>,
    pub color_hex: Option<String>,
    pub display_order: Option<i64>,
}
