//! Order Repository
//!
//! Persists the order aggregate as a single row with the item snapshots as
//! a JSON column. All business rules (pricing, transitions, discount
//! reservation) live in the order manager; this module only moves rows.

use super::{RepoError, RepoResult};
use shared::order::{Order, OrderStatus};
use sqlx::SqlitePool;
use sqlx::types::Json;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Orders still moving through the lifecycle
pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE status NOT IN ('DELIVERED', 'CANCELLED') ORDER BY created_at ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Order>> {
    let rows =
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE status = ? ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// Delivered orders that redeemed the given discount; backs the
/// discount-delete constraint
pub async fn count_completed_with_discount(
    pool: &SqlitePool,
    discount_id: i64,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE discount_id = ? AND status = 'DELIVERED'",
    )
    .bind(discount_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, customer_id, customer_tier_id, employee_id, employee_role_id, items, sub_total, include_vat, tax_amount, delivery_fee, discount_id, discount_amount, total_amount, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(order.customer_tier_id)
    .bind(order.employee_id)
    .bind(order.employee_role_id)
    .bind(Json(&order.items))
    .bind(order.sub_total)
    .bind(order.include_vat)
    .bind(order.tax_amount)
    .bind(order.delivery_fee)
    .bind(order.discount_id)
    .bind(order.discount_amount)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write back every mutable field of the aggregate
pub async fn save(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET customer_id = ?, customer_tier_id = ?, employee_id = ?, employee_role_id = ?, items = ?, sub_total = ?, include_vat = ?, tax_amount = ?, delivery_fee = ?, discount_id = ?, discount_amount = ?, total_amount = ?, status = ?, updated_at = ? WHERE id = ?",
    )
    .bind(order.customer_id)
    .bind(order.customer_tier_id)
    .bind(order.employee_id)
    .bind(order.employee_role_id)
    .bind(Json(&order.items))
    .bind(order.sub_total)
    .bind(order.include_vat)
    .bind(order.tax_amount)
    .bind(order.delivery_fee)
    .bind(order.discount_id)
    .bind(order.discount_amount)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.updated_at)
    .bind(order.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {} not found", order.id)));
    }
    Ok(())
}

pub async fn set_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::order::OrderItem;

    fn sample_order(id: i64) -> Order {
        let now = shared::util::now_millis();
        Order {
            id,
            customer_id: None,
            customer_tier_id: None,
            employee_id: None,
            employee_role_id: None,
            items: vec![OrderItem {
                product_id: 1,
                product_name: "Cơm gà".into(),
                quantity: 2,
                unit_price: 45_000.0,
                total_price: 90_000.0,
                special_instructions: None,
            }],
            sub_total: 90_000.0,
            include_vat: false,
            tax_amount: 0.0,
            delivery_fee: 0.0,
            discount_id: None,
            discount_amount: 0.0,
            total_amount: 90_000.0,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_fetch_preserves_item_json() {
        let pool = test_pool().await;
        let order = sample_order(1);
        insert(&pool, &order).await.unwrap();

        let fetched = find_by_id(&pool, 1).await.unwrap().unwrap();
        assert_eq!(fetched.items, order.items);
        assert_eq!(fetched.total_amount, 90_000.0);
        assert_eq!(fetched.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn save_writes_back_all_fields() {
        let pool = test_pool().await;
        let mut order = sample_order(2);
        insert(&pool, &order).await.unwrap();

        order.items.push(OrderItem {
            product_id: 2,
            product_name: "Trà đá".into(),
            quantity: 1,
            unit_price: 5_000.0,
            total_price: 5_000.0,
            special_instructions: Some("ít đá".into()),
        });
        order.sub_total = 95_000.0;
        order.total_amount = 95_000.0;
        order.status = OrderStatus::Confirmed;
        save(&pool, &order).await.unwrap();

        let fetched = find_by_id(&pool, 2).await.unwrap().unwrap();
        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.sub_total, 95_000.0);
        assert_eq!(fetched.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn find_active_excludes_terminal_orders() {
        let pool = test_pool().await;
        for (id, status) in [
            (1, OrderStatus::Pending),
            (2, OrderStatus::Delivered),
            (3, OrderStatus::Cancelled),
            (4, OrderStatus::Preparing),
        ] {
            let mut o = sample_order(id);
            o.status = status;
            insert(&pool, &o).await.unwrap();
        }
        let active = find_active(&pool).await.unwrap();
        let ids: Vec<_> = active.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[tokio::test]
    async fn set_status_unknown_order_is_not_found() {
        let pool = test_pool().await;
        let err = set_status(&pool, 42, OrderStatus::Confirmed, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
