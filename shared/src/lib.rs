//! Shared types for the POS system
//!
//! Data models and order types used by both the server and any client
//! preview surface. Keeping these (and the arithmetic that consumes them)
//! in one crate is what guarantees a client-side preview can never drift
//! from the server's authoritative totals.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
