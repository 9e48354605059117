//! Discount Model

use serde::{Deserialize, Serialize};

/// Discount type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DiscountType {
    Percentage,
    FixedAmount,
    BuyXGetY,
}

/// How the granted units of a Buy-X-Get-Y promotion are priced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FreeProductDiscountType {
    Free,
    Percentage,
    FixedAmount,
}

/// Discount entity (khuyến mãi)
///
/// Applicability sets are stored as JSON arrays; an empty set means
/// "no restriction" for that dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub id: i64,
    /// Redemption code, matched case-insensitively
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Percent (0-100) or fixed currency amount; unused for BuyXGetY
    pub discount_value: f64,
    /// Subtotal floor to qualify
    pub min_order_amount: Option<f64>,
    /// Cap on the computed discount (meaningful for Percentage)
    pub max_discount_amount: Option<f64>,
    /// Validity window (Unix millis, inclusive)
    pub start_date: i64,
    pub end_date: i64,
    /// Caps total redemptions across all orders
    pub usage_limit: Option<i64>,
    pub used_count: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub applicable_product_ids: Vec<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub applicable_category_ids: Vec<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub applicable_customer_tier_ids: Vec<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub applicable_employee_role_ids: Vec<i64>,

    // === BuyXGetY-only fields ===
    /// Qualifying units required per granted batch (>= 1)
    pub buy_quantity: Option<i64>,
    pub free_product_id: Option<i64>,
    /// Units granted per batch (>= 1)
    pub free_product_quantity: Option<i64>,
    pub free_product_discount_type: Option<FreeProductDiscountType>,
    pub free_product_discount_value: Option<f64>,

    /// Manual enable/disable, independent of date validity
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Discount {
    /// Structural validity: active, inside the date window, under the usage limit
    pub fn is_valid(&self, now: i64) -> bool {
        self.is_active
            && now >= self.start_date
            && now <= self.end_date
            && self.usage_limit.is_none_or(|limit| self.used_count < limit)
    }
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCreate {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: f64,
    pub min_order_amount: Option<f64>,
    pub max_discount_amount: Option<f64>,
    pub start_date: i64,
    pub end_date: i64,
    pub usage_limit: Option<i64>,
    #[serde(default)]
    pub applicable_product_ids: Vec<i64>,
    #[serde(default)]
    pub applicable_category_ids: Vec<i64>,
    #[serde(default)]
    pub applicable_customer_tier_ids: Vec<i64>,
    #[serde(default)]
    pub applicable_employee_role_ids: Vec<i64>,
    pub buy_quantity: Option<i64>,
    pub free_product_id: Option<i64>,
    pub free_product_quantity: Option<i64>,
    pub free_product_discount_type: Option<FreeProductDiscountType>,
    pub free_product_discount_value: Option<f64>,
}

/// Update discount payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscountUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub discount_value: Option<f64>,
    pub min_order_amount: Option<f64>,
    pub max_discount_amount: Option<f64>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub usage_limit: Option<i64>,
    pub applicable_product_ids: Option<Vec<i64>>,
    pub applicable_category_ids: Option<Vec<i64>>,
    pub applicable_customer_tier_ids: Option<Vec<i64>>,
    pub applicable_employee_role_ids: Option<Vec<i64>>,
    pub buy_quantity: Option<i64>,
    pub free_product_id: Option<i64>,
    pub free_product_quantity: Option<i64>,
    pub free_product_discount_type: Option<FreeProductDiscountType>,
    pub free_product_discount_value: Option<f64>,
    pub is_active: Option<bool>,
}
