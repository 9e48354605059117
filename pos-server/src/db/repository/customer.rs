//! Customer Repository
//!
//! `tier_id` is denormalized: it is re-derived from `total_spent` every
//! time spend is recorded, never edited directly.

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Customer>> {
    let rows = sqlx::query_as::<_, Customer>("SELECT * FROM customer ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let row = sqlx::query_as::<_, Customer>("SELECT * FROM customer WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CustomerCreate) -> RepoResult<Customer> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    // A zero-spend customer may already qualify for a zero-threshold tier
    let tier_id = super::customer_tier::tier_for_spend(pool, 0.0).await?;
    sqlx::query(
        "INSERT INTO customer (id, name, phone, email, total_spent, tier_id, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, 0, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(tier_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?, name), phone = COALESCE(?, phone), email = COALESCE(?, email), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

/// Add a delivered order's total to lifetime spend and re-derive the tier
pub async fn record_spending(pool: &SqlitePool, id: i64, amount: f64) -> RepoResult<Customer> {
    if amount < 0.0 {
        return Err(RepoError::Validation("amount must be non-negative".into()));
    }
    let customer = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))?;

    let new_total = customer.total_spent + amount;
    let tier_id = super::customer_tier::tier_for_spend(pool, new_total).await?;
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer SET total_spent = ?, tier_id = ?, updated_at = ? WHERE id = ?")
        .bind(new_total)
        .bind(tier_id)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::models::CustomerTierCreate;

    async fn seed_tier(pool: &SqlitePool, name: &str, min: f64) -> i64 {
        super::super::customer_tier::create(
            pool,
            CustomerTierCreate {
                name: name.into(),
                minimum_spent: min,
                color_hex: None,
                display_order: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn new_customer_gets_zero_threshold_tier() {
        let pool = test_pool().await;
        let bronze = seed_tier(&pool, "Bronze", 0.0).await;
        seed_tier(&pool, "Gold", 5_000_000.0).await;

        let c = create(
            &pool,
            CustomerCreate {
                name: "An".into(),
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(c.total_spent, 0.0);
        assert_eq!(c.tier_id, Some(bronze));
    }

    #[tokio::test]
    async fn record_spending_promotes_tier() {
        let pool = test_pool().await;
        let bronze = seed_tier(&pool, "Bronze", 0.0).await;
        let gold = seed_tier(&pool, "Gold", 1_000_000.0).await;

        let c = create(
            &pool,
            CustomerCreate {
                name: "Bình".into(),
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(c.tier_id, Some(bronze));

        let c = record_spending(&pool, c.id, 600_000.0).await.unwrap();
        assert_eq!(c.tier_id, Some(bronze));
        let c = record_spending(&pool, c.id, 500_000.0).await.unwrap();
        assert_eq!(c.total_spent, 1_100_000.0);
        assert_eq!(c.tier_id, Some(gold));
    }

    #[tokio::test]
    async fn record_spending_rejects_negative() {
        let pool = test_pool().await;
        let c = create(
            &pool,
            CustomerCreate {
                name: "Chi".into(),
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap();
        assert!(matches!(
            record_spending(&pool, c.id, -10.0).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }
}
