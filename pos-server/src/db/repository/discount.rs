//! Discount Repository
//!
//! Owns `used_count` consistency: the usage increment is a single
//! conditional UPDATE so two concurrent confirmations can never push a
//! limited discount past its cap.

use super::{RepoError, RepoResult};
use shared::models::{Discount, DiscountCreate, DiscountType, DiscountUpdate, FreeProductDiscountType};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COLUMNS: &str = "id, code, name, description, discount_type, discount_value, min_order_amount, max_discount_amount, start_date, end_date, usage_limit, used_count, applicable_product_ids, applicable_category_ids, applicable_customer_tier_ids, applicable_employee_role_ids, buy_quantity, free_product_id, free_product_quantity, free_product_discount_type, free_product_discount_value, is_active, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let sql = format!("SELECT {COLUMNS} FROM discount ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Discount>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Discount>> {
    let sql = format!("SELECT {COLUMNS} FROM discount WHERE id = ?");
    let row = sqlx::query_as::<_, Discount>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Case-insensitive exact match on the redemption code
pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Discount>> {
    let sql = format!("SELECT {COLUMNS} FROM discount WHERE code = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, Discount>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Discounts that are structurally valid right now
pub async fn find_active(pool: &SqlitePool, now: i64) -> RepoResult<Vec<Discount>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM discount WHERE is_active = 1 AND start_date <= ?1 AND end_date >= ?1 AND (usage_limit IS NULL OR used_count < usage_limit) ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Discount>(&sql)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

fn validate_create(data: &DiscountCreate) -> RepoResult<()> {
    if data.code.trim().is_empty() {
        return Err(RepoError::Validation("code must not be empty".into()));
    }
    if data.start_date > data.end_date {
        return Err(RepoError::Validation(
            "start_date must not be after end_date".into(),
        ));
    }
    if let Some(limit) = data.usage_limit
        && limit < 1
    {
        return Err(RepoError::Validation("usage_limit must be at least 1".into()));
    }
    if let Some(min) = data.min_order_amount
        && min < 0.0
    {
        return Err(RepoError::Validation(
            "min_order_amount must be non-negative".into(),
        ));
    }
    match data.discount_type {
        DiscountType::Percentage => {
            if !(0.0..=100.0).contains(&data.discount_value) || data.discount_value == 0.0 {
                return Err(RepoError::Validation(
                    "percentage discount_value must be between 0 and 100".into(),
                ));
            }
        }
        DiscountType::FixedAmount => {
            if data.discount_value <= 0.0 {
                return Err(RepoError::Validation(
                    "fixed discount_value must be positive".into(),
                ));
            }
        }
        DiscountType::BuyXGetY => {
            if data.buy_quantity.unwrap_or(0) < 1 {
                return Err(RepoError::Validation("buy_quantity must be at least 1".into()));
            }
            if data.free_product_id.is_none() {
                return Err(RepoError::Validation("free_product_id is required".into()));
            }
            if data.free_product_quantity.unwrap_or(0) < 1 {
                return Err(RepoError::Validation(
                    "free_product_quantity must be at least 1".into(),
                ));
            }
            match data.free_product_discount_type {
                None => {
                    return Err(RepoError::Validation(
                        "free_product_discount_type is required".into(),
                    ));
                }
                Some(FreeProductDiscountType::Percentage) => {
                    let v = data.free_product_discount_value.unwrap_or(0.0);
                    if !(0.0..=100.0).contains(&v) || v == 0.0 {
                        return Err(RepoError::Validation(
                            "free_product_discount_value must be between 0 and 100".into(),
                        ));
                    }
                }
                Some(FreeProductDiscountType::FixedAmount) => {
                    if data.free_product_discount_value.unwrap_or(0.0) <= 0.0 {
                        return Err(RepoError::Validation(
                            "free_product_discount_value must be positive".into(),
                        ));
                    }
                }
                Some(FreeProductDiscountType::Free) => {}
            }
        }
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: DiscountCreate) -> RepoResult<Discount> {
    validate_create(&data)?;
    if find_by_code(pool, &data.code).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Discount code '{}' already exists",
            data.code
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO discount (id, code, name, description, discount_type, discount_value, min_order_amount, max_discount_amount, start_date, end_date, usage_limit, used_count, applicable_product_ids, applicable_category_ids, applicable_customer_tier_ids, applicable_employee_role_ids, buy_quantity, free_product_id, free_product_quantity, free_product_discount_type, free_product_discount_value, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.discount_type)
    .bind(data.discount_value)
    .bind(data.min_order_amount)
    .bind(data.max_discount_amount)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.usage_limit)
    .bind(Json(&data.applicable_product_ids))
    .bind(Json(&data.applicable_category_ids))
    .bind(Json(&data.applicable_customer_tier_ids))
    .bind(Json(&data.applicable_employee_role_ids))
    .bind(data.buy_quantity)
    .bind(data.free_product_id)
    .bind(data.free_product_quantity)
    .bind(data.free_product_discount_type)
    .bind(data.free_product_discount_value)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

    if let Some(ref new_code) = data.code
        && !new_code.eq_ignore_ascii_case(&existing.code)
        && find_by_code(pool, new_code).await?.is_some()
    {
        return Err(RepoError::Duplicate(format!(
            "Discount code '{new_code}' already exists"
        )));
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE discount SET code = COALESCE(?, code), name = COALESCE(?, name), description = COALESCE(?, description), discount_value = COALESCE(?, discount_value), min_order_amount = COALESCE(?, min_order_amount), max_discount_amount = COALESCE(?, max_discount_amount), start_date = COALESCE(?, start_date), end_date = COALESCE(?, end_date), usage_limit = COALESCE(?, usage_limit), applicable_product_ids = COALESCE(?, applicable_product_ids), applicable_category_ids = COALESCE(?, applicable_category_ids), applicable_customer_tier_ids = COALESCE(?, applicable_customer_tier_ids), applicable_employee_role_ids = COALESCE(?, applicable_employee_role_ids), buy_quantity = COALESCE(?, buy_quantity), free_product_id = COALESCE(?, free_product_id), free_product_quantity = COALESCE(?, free_product_quantity), free_product_discount_type = COALESCE(?, free_product_discount_type), free_product_discount_value = COALESCE(?, free_product_discount_value), is_active = COALESCE(?, is_active), updated_at = ? WHERE id = ?",
    )
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.discount_value)
    .bind(data.min_order_amount)
    .bind(data.max_discount_amount)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.usage_limit)
    .bind(data.applicable_product_ids.as_ref().map(Json))
    .bind(data.applicable_category_ids.as_ref().map(Json))
    .bind(data.applicable_customer_tier_ids.as_ref().map(Json))
    .bind(data.applicable_employee_role_ids.as_ref().map(Json))
    .bind(data.buy_quantity)
    .bind(data.free_product_id)
    .bind(data.free_product_quantity)
    .bind(data.free_product_discount_type)
    .bind(data.free_product_discount_value)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
}

/// Hard delete, blocked while any completed order still references the
/// discount (shift reports would otherwise lose their redemption trail)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let referencing = super::order::count_completed_with_discount(pool, id).await?;
    if referencing > 0 {
        return Err(RepoError::Conflict(format!(
            "Discount {id} is referenced by {referencing} completed order(s)"
        )));
    }

    let rows = sqlx::query("DELETE FROM discount WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Atomically reserve one redemption.
///
/// Returns `false` when the usage limit is already reached; the
/// conditional UPDATE makes concurrent confirmations race-safe without an
/// application-level lock.
pub async fn increment_usage(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE discount SET used_count = used_count + 1, updated_at = ?1 WHERE id = ?2 AND (usage_limit IS NULL OR used_count < usage_limit)",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Return one reserved redemption (order cancelled after confirmation, or
/// recompute failed after the reservation). Floors at zero.
pub async fn release_usage(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<()> {
    sqlx::query(
        "UPDATE discount SET used_count = MAX(used_count - 1, 0), updated_at = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
