//! Order Module
//!
//! The order manager owns the order lifecycle: creation with server-side
//! price snapshots, the status state machine, and discount usage
//! reservation at confirmation.

pub mod manager;

pub use manager::{OrderManager, OrderPreview};

use crate::db::repository::RepoError;
use crate::pricing::PricingError;
use shared::order::OrderStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order {0} not found")]
    NotFound(i64),

    #[error("Order {0} is already {1:?} and cannot change")]
    Terminal(i64, OrderStatus),

    #[error("Cannot move order from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order {0} can only be edited while pending")]
    NotEditable(i64),

    #[error("Discount usage limit reached")]
    DiscountExhausted,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;
