//! Customer API module (customers and tiers)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/customers", customer_routes())
        .nest("/api/customer-tiers", tier_routes())
}

fn customer_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}

fn tier_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_tiers).post(handler::create_tier))
        .route(
            "/{id}",
            get(handler::get_tier)
                .put(handler::update_tier)
                .delete(handler::delete_tier),
        )
}
