//! Data models
//!
//! Shared between pos-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod category;
pub mod customer;
pub mod customer_tier;
pub mod discount;
pub mod product;

// Re-exports
pub use category::*;
pub use customer::*;
pub use customer_tier::*;
pub use discount::*;
pub use product::*;
