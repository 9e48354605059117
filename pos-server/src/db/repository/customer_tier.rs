//! Customer Tier Repository

use super::{RepoError, RepoResult};
use shared::models::{CustomerTier, CustomerTierCreate, CustomerTierUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<CustomerTier>> {
    let rows = sqlx::query_as::<_, CustomerTier>(
        "SELECT * FROM customer_tier ORDER BY minimum_spent ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CustomerTier>> {
    let row = sqlx::query_as::<_, CustomerTier>("SELECT * FROM customer_tier WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The tier a given lifetime spend qualifies for, if any
pub async fn tier_for_spend(pool: &SqlitePool, total_spent: f64) -> RepoResult<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM customer_tier WHERE minimum_spent <= ? ORDER BY minimum_spent DESC LIMIT 1",
    )
    .bind(total_spent)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}

pub async fn create(pool: &SqlitePool, data: CustomerTierCreate) -> RepoResult<CustomerTier> {
    if data.name.trim().is_empty() {
        return Err(RepoError::Validation("name must not be empty".into()));
    }
    if data.minimum_spent < 0.0 {
        return Err(RepoError::Validation(
            "minimum_spent must be non-negative".into(),
        ));
    }
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer_tier (id, name, minimum_spent, color_hex, display_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.minimum_spent)
    .bind(&data.color_hex)
    .bind(data.display_order.unwrap_or(0))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer tier".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: CustomerTierUpdate,
) -> RepoResult<CustomerTier> {
    if let Some(min) = data.minimum_spent
        && min < 0.0
    {
        return Err(RepoError::Validation(
            "minimum_spent must be non-negative".into(),
        ));
    }
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer_tier SET name = COALESCE(?, name), minimum_spent = COALESCE(?, minimum_spent), color_hex = COALESCE(?, color_hex), display_order = COALESCE(?, display_order), updated_at = ? WHERE id = ?",
    )
    .bind(&data.name)
    .bind(data.minimum_spent)
    .bind(&data.color_hex)
    .bind(data.display_order)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer tier {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer tier {id} not found")))
}

/// Blocked while customers still hold the tier
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let referencing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer WHERE tier_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if referencing > 0 {
        return Err(RepoError::Conflict(format!(
            "Customer tier {id} is assigned to {referencing} customer(s)"
        )));
    }
    let rows = sqlx::query("DELETE FROM customer_tier WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
