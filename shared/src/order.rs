//! Order types
//!
//! The order aggregate and its line items. Monetary fields are stored as
//! `f64` for serialization; all arithmetic on them happens in the server's
//! pricing module using `rust_decimal`.

use serde::{Deserialize, Serialize};

/// Order lifecycle state machine
///
/// Pending → Confirmed → Preparing → Delivering → Delivered,
/// with Cancelled reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Delivering,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states permit no further mutation or transition
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `next` is a legal transition from this state
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, Preparing) => true,
            // Delivering is optional for dine-in/takeaway
            (Preparing, Delivering) | (Preparing, Delivered) => true,
            (Delivering, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Order line item - price fields are snapshots taken when the item is added
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    /// Denormalized name snapshot
    pub product_name: String,
    pub quantity: i32,
    /// Unit price snapshot at the time the item was added
    pub unit_price: f64,
    /// unit_price × quantity
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Order item input - for adding items (prices are snapshotted server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

/// Order entity
///
/// Invariants maintained by the server's recompute step:
/// - `sub_total` = Σ item.total_price
/// - `total_amount` = max(0, sub_total + tax_amount + delivery_fee − discount_amount)
/// - `discount_id` and `discount_amount` are set together or both cleared
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    /// Tier snapshot resolved at order creation / customer link time
    pub customer_tier_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub employee_role_id: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderItem>,
    pub sub_total: f64,
    /// VAT is an explicit opt-in per order, not always applied
    pub include_vat: bool,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub discount_id: Option<i64>,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub employee_role_id: Option<i64>,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub include_vat: bool,
    pub delivery_fee: Option<f64>,
    pub discount_id: Option<i64>,
}

/// Update order payload
///
/// `None` fields are left unchanged. Clearing the selected discount is an
/// explicit flag so "no change" and "remove" stay distinguishable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderUpdate {
    pub items: Option<Vec<OrderItemInput>>,
    pub discount_id: Option<i64>,
    #[serde(default)]
    pub clear_discount: bool,
    pub include_vat: Option<bool>,
    pub delivery_fee: Option<f64>,
}
