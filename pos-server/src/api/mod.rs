//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`catalog`] - categories and products
//! - [`customers`] - customers and tiers
//! - [`discounts`] - discount administration and code validation
//! - [`orders`] - order lifecycle and pricing preview

pub mod catalog;
pub mod customers;
pub mod discounts;
pub mod health;
pub mod orders;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Compose every resource router into the application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(catalog::router())
        .merge(customers::router())
        .merge(discounts::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
