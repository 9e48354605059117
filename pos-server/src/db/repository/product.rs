//! Product Repository

use super::{RepoError, RepoResult};
use crate::pricing::money::validate_unit_price;
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>("SELECT * FROM product ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>("SELECT * FROM product WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Product>> {
    let rows =
        sqlx::query_as::<_, Product>("SELECT * FROM product WHERE category_id = ? ORDER BY name ASC")
            .bind(category_id)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    validate_unit_price(data.price).map_err(|e| RepoError::Validation(e.to_string()))?;
    if super::category::find_by_id(pool, data.category_id).await?.is_none() {
        return Err(RepoError::Validation(format!(
            "Category {} does not exist",
            data.category_id
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, description, price, category_id, image_url, is_active, is_available, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price {
        validate_unit_price(price).map_err(|e| RepoError::Validation(e.to_string()))?;
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?, name), description = COALESCE(?, description), price = COALESCE(?, price), category_id = COALESCE(?, category_id), image_url = COALESCE(?, image_url), is_active = COALESCE(?, is_active), is_available = COALESCE(?, is_available), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(data.is_available)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::models::CategoryCreate;

    async fn seed_category(pool: &SqlitePool) -> i64 {
        super::super::category::create(
            pool,
            CategoryCreate {
                name: "Food".into(),
                description: None,
                display_order: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_snapshots_defaults() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let p = create(
            &pool,
            ProductCreate {
                name: "Phở bò".into(),
                description: None,
                price: 65_000.0,
                category_id: cat,
                image_url: None,
            },
        )
        .await
        .unwrap();
        assert!(p.is_active);
        assert!(p.is_available);
        assert_eq!(p.price, 65_000.0);
    }

    #[tokio::test]
    async fn create_rejects_bad_price_and_missing_category() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let bad_price = create(
            &pool,
            ProductCreate {
                name: "X".into(),
                description: None,
                price: -1.0,
                category_id: cat,
                image_url: None,
            },
        )
        .await;
        assert!(matches!(bad_price.unwrap_err(), RepoError::Validation(_)));

        let no_cat = create(
            &pool,
            ProductCreate {
                name: "X".into(),
                description: None,
                price: 1_000.0,
                category_id: 999,
                image_url: None,
            },
        )
        .await;
        assert!(matches!(no_cat.unwrap_err(), RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn update_toggles_availability() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let p = create(
            &pool,
            ProductCreate {
                name: "Trà đá".into(),
                description: None,
                price: 5_000.0,
                category_id: cat,
                image_url: None,
            },
        )
        .await
        .unwrap();
        let p = update(
            &pool,
            p.id,
            ProductUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!p.is_available);
        assert!(p.is_active);
    }
}
