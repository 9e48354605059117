//! Catalog API module (categories and products)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/categories", category_routes())
        .nest("/api/products", product_routes())
}

fn category_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_categories).post(handler::create_category))
        .route(
            "/{id}",
            get(handler::get_category)
                .put(handler::update_category)
                .delete(handler::delete_category),
        )
        .route("/{id}/products", get(handler::list_category_products))
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_products).post(handler::create_product))
        .route(
            "/{id}",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
}
