//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/active", get(handler::list_active))
        .route("/preview", post(handler::preview))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/preview", get(handler::preview_by_id))
        .route("/{id}/confirm", post(handler::confirm))
        .route("/{id}/status", post(handler::set_status))
}
