//! Pricing engine
//!
//! Discount eligibility, discount amount calculation and order-total
//! composition. Everything in this module is a pure function over
//! snapshots (order items, discount definitions, a catalog view) so the
//! same arithmetic backs interactive previews and the authoritative
//! recompute on save.

pub mod calculator;
pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod money;
pub mod order_total;

pub use calculator::{BogoPolicy, DiscountOutcome, compute_discount};
pub use catalog::{Catalog, ProductMeta};
pub use eligibility::{OrderContext, check, find_applicable};
pub use error::{IneligibleReason, PricingError};
pub use order_total::{PricingPolicy, recompute};
