//! Catalog snapshot
//!
//! Read-only product view the pricing functions run against. Built from
//! the product table per request so eligibility and amount calculation
//! never touch the database themselves.

use shared::models::Product;
use std::collections::HashMap;

/// Product metadata needed by the pricing engine
#[derive(Debug, Clone)]
pub struct ProductMeta {
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    pub is_active: bool,
    pub is_available: bool,
}

/// Immutable product lookup for one pricing pass
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<i64, ProductMeta>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: &[Product]) -> Self {
        let mut catalog = Self::new();
        for p in products {
            catalog.products.insert(
                p.id,
                ProductMeta {
                    name: p.name.clone(),
                    price: p.price,
                    category_id: p.category_id,
                    is_active: p.is_active,
                    is_available: p.is_available,
                },
            );
        }
        catalog
    }

    pub fn product(&self, id: i64) -> Option<&ProductMeta> {
        self.products.get(&id)
    }

    /// Category of a product, if known
    pub fn category_of(&self, product_id: i64) -> Option<i64> {
        self.products.get(&product_id).map(|p| p.category_id)
    }

    /// Whether a product can currently be sold or granted
    pub fn is_sellable(&self, id: i64) -> bool {
        self.products
            .get(&id)
            .is_some_and(|p| p.is_active && p.is_available)
    }

    /// Insert a product directly (tests and cache warm-up)
    pub fn insert(&mut self, id: i64, meta: ProductMeta) {
        self.products.insert(id, meta);
    }
}
