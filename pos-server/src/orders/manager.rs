//! Order Manager
//!
//! Serializes mutations per order with a keyed async lock, snapshots
//! catalog prices into line items, and drives the status state machine.
//! Discount usage is reserved with the repository's conditional increment
//! at confirmation time and returned on cancellation or pricing failure,
//! so a usage-limited discount can never be over-redeemed.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::db::repository::{self, RepoError};
use crate::pricing::{Catalog, PricingError, PricingPolicy, recompute};
use crate::pricing::money::{validate_delivery_fee, validate_item_input, validate_unit_price};
use shared::order::{Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate};

use super::{OrderError, OrderResult};

/// Pricing preview for an order payload that is not persisted
#[derive(Debug, Clone, Serialize)]
pub struct OrderPreview {
    pub order: Order,
    /// Buy-X-Get-Y grants the kitchen should add, not stored on the order
    pub free_items: Vec<OrderItem>,
}

pub struct OrderManager {
    pool: SqlitePool,
    policy: PricingPolicy,
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl OrderManager {
    pub fn new(pool: SqlitePool, policy: PricingPolicy) -> Self {
        Self {
            pool,
            policy,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, order_id: i64) -> Arc<Mutex<()>> {
        self.locks
            .entry(order_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_catalog(&self) -> OrderResult<Catalog> {
        let products = repository::product::find_all(&self.pool).await?;
        Ok(Catalog::from_products(&products))
    }

    /// Build line items from client input, snapshotting name and price from
    /// the catalog. Clients never supply prices.
    fn snapshot_items(
        &self,
        inputs: &[OrderItemInput],
        catalog: &Catalog,
    ) -> OrderResult<Vec<OrderItem>> {
        if inputs.is_empty() {
            return Err(PricingError::Validation(
                "order must contain at least one item".into(),
            )
            .into());
        }
        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            validate_item_input(input)?;
            let meta = catalog.product(input.product_id).ok_or_else(|| {
                PricingError::Validation(format!("Product {} does not exist", input.product_id))
            })?;
            if !catalog.is_sellable(input.product_id) {
                return Err(PricingError::Validation(format!(
                    "Product '{}' is not available",
                    meta.name
                ))
                .into());
            }
            validate_unit_price(meta.price)?;
            items.push(OrderItem {
                product_id: input.product_id,
                product_name: meta.name.clone(),
                quantity: input.quantity,
                unit_price: meta.price,
                total_price: 0.0, // recompute fills this in
                special_instructions: input.special_instructions.clone(),
            });
        }
        Ok(items)
    }

    /// Assemble a priced order from a create payload without persisting it
    async fn build_order(
        &self,
        data: &OrderCreate,
        now: i64,
    ) -> OrderResult<(Order, crate::pricing::DiscountOutcome)> {
        let delivery_fee = data.delivery_fee.unwrap_or(0.0);
        validate_delivery_fee(delivery_fee)?;

        let catalog = self.load_catalog().await?;
        let items = self.snapshot_items(&data.items, &catalog)?;

        // Tier snapshot comes from the customer record, never the client
        let customer_tier_id = match data.customer_id {
            Some(cid) => {
                let customer = repository::customer::find_by_id(&self.pool, cid)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Customer {cid} not found")))?;
                customer.tier_id
            }
            None => None,
        };

        let mut order = Order {
            id: shared::util::snowflake_id(),
            customer_id: data.customer_id,
            customer_tier_id,
            employee_id: data.employee_id,
            employee_role_id: data.employee_role_id,
            items,
            sub_total: 0.0,
            include_vat: data.include_vat,
            tax_amount: 0.0,
            delivery_fee,
            discount_id: None,
            discount_amount: 0.0,
            total_amount: 0.0,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let discount = match data.discount_id {
            Some(did) => Some(
                repository::discount::find_by_id(&self.pool, did)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Discount {did} not found")))?,
            ),
            None => None,
        };
        let outcome = recompute(&mut order, discount.as_ref(), &catalog, &self.policy, now)?;
        Ok((order, outcome))
    }

    pub async fn create_order(&self, data: OrderCreate) -> OrderResult<Order> {
        let now = shared::util::now_millis();
        let (order, _) = self.build_order(&data, now).await?;
        repository::order::insert(&self.pool, &order).await?;
        tracing::info!(order_id = order.id, total = order.total_amount, "Order created");
        Ok(order)
    }

    /// Price an order payload without persisting anything
    pub async fn preview(&self, data: OrderCreate) -> OrderResult<OrderPreview> {
        let now = shared::util::now_millis();
        let (mut order, outcome) = self.build_order(&data, now).await?;
        order.id = 0;
        Ok(OrderPreview {
            order,
            free_items: outcome.free_items,
        })
    }

    /// Resolve a redemption code and verify it against an order, or only
    /// structurally when no order is given.
    pub async fn validate_code(
        &self,
        code: &str,
        order_id: Option<i64>,
    ) -> OrderResult<shared::models::Discount> {
        use crate::pricing::{IneligibleReason, OrderContext, check};

        let discount = repository::discount::find_by_code(&self.pool, code)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount code '{code}' not found")))?;
        let now = shared::util::now_millis();

        match order_id {
            Some(oid) => {
                let order = self.get_order(oid).await?;
                let catalog = self.load_catalog().await?;
                check(&discount, &OrderContext::of(&order), &catalog, now)
                    .map_err(PricingError::NotApplicable)?;
            }
            None => {
                // Without an order only the structural gates can run
                let reason = if !discount.is_active {
                    Some(IneligibleReason::Inactive)
                } else if now < discount.start_date {
                    Some(IneligibleReason::NotStarted)
                } else if now > discount.end_date {
                    Some(IneligibleReason::Expired)
                } else if !discount.is_valid(now) {
                    Some(IneligibleReason::UsageExhausted)
                } else {
                    None
                };
                if let Some(reason) = reason {
                    return Err(PricingError::NotApplicable(reason).into());
                }
            }
        }
        Ok(discount)
    }

    /// Re-price an existing order without persisting, optionally trying a
    /// different discount than the one currently selected
    pub async fn preview_order(
        &self,
        id: i64,
        discount_id: Option<i64>,
    ) -> OrderResult<OrderPreview> {
        let mut order = self.get_order(id).await?;
        let catalog = self.load_catalog().await?;
        let now = shared::util::now_millis();

        let selected = discount_id.or(order.discount_id);
        let discount = match selected {
            Some(did) => Some(
                repository::discount::find_by_id(&self.pool, did)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Discount {did} not found")))?,
            ),
            None => None,
        };
        let outcome = recompute(&mut order, discount.as_ref(), &catalog, &self.policy, now)?;
        Ok(OrderPreview {
            order,
            free_items: outcome.free_items,
        })
    }

    pub async fn get_order(&self, id: i64) -> OrderResult<Order> {
        repository::order::find_by_id(&self.pool, id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    pub async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(repository::order::find_all(&self.pool).await?)
    }

    pub async fn list_active(&self) -> OrderResult<Vec<Order>> {
        Ok(repository::order::find_active(&self.pool).await?)
    }

    /// Edit a pending order. Item, VAT and delivery-fee changes are only
    /// legal while pending; the discount selection can also be swapped on a
    /// confirmed order, which re-reserves usage before releasing the old
    /// reservation.
    pub async fn update_order(&self, id: i64, data: OrderUpdate) -> OrderResult<Order> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut order = self.get_order(id).await?;
        if order.status.is_terminal() {
            return Err(OrderError::Terminal(id, order.status));
        }
        let structural =
            data.items.is_some() || data.include_vat.is_some() || data.delivery_fee.is_some();
        if structural && order.status != OrderStatus::Pending {
            return Err(OrderError::NotEditable(id));
        }

        let catalog = self.load_catalog().await?;
        if let Some(inputs) = &data.items {
            order.items = self.snapshot_items(inputs, &catalog)?;
        }
        if let Some(vat) = data.include_vat {
            order.include_vat = vat;
        }
        if let Some(fee) = data.delivery_fee {
            validate_delivery_fee(fee)?;
            order.delivery_fee = fee;
        }

        let now = shared::util::now_millis();
        let old_discount_id = order.discount_id;
        let new_discount_id = if data.clear_discount {
            None
        } else {
            data.discount_id.or(old_discount_id)
        };

        let discount = match new_discount_id {
            Some(did) => Some(
                repository::discount::find_by_id(&self.pool, did)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Discount {did} not found")))?,
            ),
            None => None,
        };

        if order.status == OrderStatus::Pending {
            recompute(&mut order, discount.as_ref(), &catalog, &self.policy, now)?;
        } else if new_discount_id != old_discount_id {
            // Confirmed order swapping its discount: reserve the new one
            // first so the order is never left holding nothing
            if let Some(d) = discount.as_ref() {
                if !repository::discount::increment_usage(&self.pool, d.id, now).await? {
                    return Err(OrderError::DiscountExhausted);
                }
                if let Err(e) = recompute(&mut order, Some(d), &catalog, &self.policy, now) {
                    repository::discount::release_usage(&self.pool, d.id, now).await?;
                    return Err(e.into());
                }
            } else {
                recompute(&mut order, None, &catalog, &self.policy, now)?;
            }
            if let Some(old) = old_discount_id {
                repository::discount::release_usage(&self.pool, old, now).await?;
            }
        }

        order.updated_at = now;
        repository::order::save(&self.pool, &order).await?;
        Ok(order)
    }

    /// Reserve the discount (if any) and move the order to Confirmed.
    ///
    /// The eligibility recompute runs against the discount snapshot taken
    /// before the increment, so the order's own reservation cannot trip
    /// the usage gate.
    async fn confirm_inner(&self, order: &mut Order, now: i64) -> OrderResult<()> {
        let catalog = self.load_catalog().await?;
        match order.discount_id {
            Some(did) => {
                let snapshot = repository::discount::find_by_id(&self.pool, did)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Discount {did} not found")))?;
                if !repository::discount::increment_usage(&self.pool, did, now).await? {
                    return Err(OrderError::DiscountExhausted);
                }
                if let Err(e) = recompute(order, Some(&snapshot), &catalog, &self.policy, now) {
                    repository::discount::release_usage(&self.pool, did, now).await?;
                    return Err(e.into());
                }
            }
            None => {
                recompute(order, None, &catalog, &self.policy, now)?;
            }
        }
        order.status = OrderStatus::Confirmed;
        order.updated_at = now;
        Ok(())
    }

    pub async fn confirm_order(&self, id: i64) -> OrderResult<Order> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut order = self.get_order(id).await?;
        if order.status.is_terminal() {
            return Err(OrderError::Terminal(id, order.status));
        }
        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Confirmed,
            });
        }

        let now = shared::util::now_millis();
        self.confirm_inner(&mut order, now).await?;
        repository::order::save(&self.pool, &order).await?;
        tracing::info!(order_id = id, "Order confirmed");
        Ok(order)
    }

    /// Move an order along the lifecycle. Side effects:
    /// - Confirmed goes through discount reservation
    /// - Cancelled after confirmation releases the reservation
    /// - Delivered records the total against the customer's lifetime spend
    pub async fn set_status(&self, id: i64, next: OrderStatus) -> OrderResult<Order> {
        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        let mut order = self.get_order(id).await?;
        if order.status.is_terminal() {
            return Err(OrderError::Terminal(id, order.status));
        }
        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        let now = shared::util::now_millis();
        match next {
            OrderStatus::Confirmed => {
                self.confirm_inner(&mut order, now).await?;
            }
            OrderStatus::Cancelled => {
                // Usage is reserved at confirmation; a pending order holds none
                if order.status != OrderStatus::Pending
                    && let Some(did) = order.discount_id
                {
                    repository::discount::release_usage(&self.pool, did, now).await?;
                }
                order.status = OrderStatus::Cancelled;
                order.updated_at = now;
            }
            OrderStatus::Delivered => {
                if let Some(cid) = order.customer_id {
                    repository::customer::record_spending(&self.pool, cid, order.total_amount)
                        .await?;
                }
                order.status = OrderStatus::Delivered;
                order.updated_at = now;
            }
            _ => {
                order.status = next;
                order.updated_at = now;
            }
        }
        repository::order::save(&self.pool, &order).await?;
        tracing::info!(order_id = id, status = ?next, "Order status changed");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use shared::models::{
        CategoryCreate, CustomerCreate, CustomerTierCreate, DiscountCreate, DiscountType,
        ProductCreate,
    };

    async fn manager() -> OrderManager {
        OrderManager::new(test_pool().await, PricingPolicy::default())
    }

    async fn seed_product(m: &OrderManager, name: &str, price: f64) -> i64 {
        let cat = repository::category::create(
            &m.pool,
            CategoryCreate {
                name: format!("cat-{name}"),
                description: None,
                display_order: None,
            },
        )
        .await
        .unwrap();
        repository::product::create(
            &m.pool,
            ProductCreate {
                name: name.into(),
                description: None,
                price,
                category_id: cat.id,
                image_url: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_discount(m: &OrderManager, code: &str, usage_limit: Option<i64>) -> i64 {
        repository::discount::create(
            &m.pool,
            DiscountCreate {
                code: code.into(),
                name: code.into(),
                description: None,
                discount_type: DiscountType::Percentage,
                discount_value: 10.0,
                min_order_amount: None,
                max_discount_amount: None,
                start_date: 0,
                end_date: i64::MAX,
                usage_limit,
                applicable_product_ids: vec![],
                applicable_category_ids: vec![],
                applicable_customer_tier_ids: vec![],
                applicable_employee_role_ids: vec![],
                buy_quantity: None,
                free_product_id: None,
                free_product_quantity: None,
                free_product_discount_type: None,
                free_product_discount_value: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn payload(product_id: i64, quantity: i32) -> OrderCreate {
        OrderCreate {
            customer_id: None,
            employee_id: None,
            employee_role_id: None,
            items: vec![OrderItemInput {
                product_id,
                quantity,
                special_instructions: None,
            }],
            include_vat: false,
            delivery_fee: None,
            discount_id: None,
        }
    }

    #[tokio::test]
    async fn create_snapshots_catalog_prices() {
        let m = manager().await;
        let pid = seed_product(&m, "Phở", 65_000.0).await;
        let order = m.create_order(payload(pid, 2)).await.unwrap();
        assert_eq!(order.items[0].unit_price, 65_000.0);
        assert_eq!(order.items[0].product_name, "Phở");
        assert_eq!(order.sub_total, 130_000.0);
        assert_eq!(order.total_amount, 130_000.0);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn create_rejects_unavailable_product_and_empty_order() {
        let m = manager().await;
        let pid = seed_product(&m, "Bún", 40_000.0).await;
        repository::product::update(
            &m.pool,
            pid,
            shared::models::ProductUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = m.create_order(payload(pid, 1)).await.unwrap_err();
        assert!(matches!(err, OrderError::Pricing(PricingError::Validation(_))));

        let mut empty = payload(pid, 1);
        empty.items.clear();
        let err = m.create_order(empty).await.unwrap_err();
        assert!(matches!(err, OrderError::Pricing(PricingError::Validation(_))));
    }

    #[tokio::test]
    async fn confirm_reserves_discount_usage() {
        let m = manager().await;
        let pid = seed_product(&m, "Cơm", 50_000.0).await;
        let did = seed_discount(&m, "TEN", Some(1)).await;

        let mut data = payload(pid, 2);
        data.discount_id = Some(did);
        let order = m.create_order(data).await.unwrap();
        assert_eq!(order.discount_amount, 10_000.0);

        let order = m.confirm_order(order.id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        let d = repository::discount::find_by_id(&m.pool, did)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.used_count, 1);
    }

    #[tokio::test]
    async fn confirm_succeeds_when_own_reservation_takes_last_slot() {
        // usage_limit 1, used 0: the order's own increment must not fail
        // the eligibility recompute that follows it
        let m = manager().await;
        let pid = seed_product(&m, "Gỏi", 70_000.0).await;
        let did = seed_discount(&m, "LAST", Some(1)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(did);
        let order = m.create_order(data).await.unwrap();
        assert!(m.confirm_order(order.id).await.is_ok());
    }

    #[tokio::test]
    async fn confirm_fails_when_limit_already_consumed() {
        let m = manager().await;
        let pid = seed_product(&m, "Chè", 25_000.0).await;
        let did = seed_discount(&m, "ONE", Some(1)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(did);
        let first = m.create_order(data.clone()).await.unwrap();
        let second = m.create_order(data).await.unwrap();

        m.confirm_order(first.id).await.unwrap();
        let err = m.confirm_order(second.id).await.unwrap_err();
        assert!(matches!(err, OrderError::DiscountExhausted));

        // The loser stays pending and the count is not corrupted
        let second = m.get_order(second.id).await.unwrap();
        assert_eq!(second.status, OrderStatus::Pending);
        let d = repository::discount::find_by_id(&m.pool, did)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.used_count, 1);
    }

    #[tokio::test]
    async fn cancel_after_confirm_releases_usage() {
        let m = manager().await;
        let pid = seed_product(&m, "Xôi", 30_000.0).await;
        let did = seed_discount(&m, "REL", Some(5)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(did);
        let order = m.create_order(data).await.unwrap();
        m.confirm_order(order.id).await.unwrap();
        m.set_status(order.id, OrderStatus::Cancelled).await.unwrap();

        let d = repository::discount::find_by_id(&m.pool, did)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.used_count, 0);
    }

    #[tokio::test]
    async fn cancel_pending_releases_nothing() {
        let m = manager().await;
        let pid = seed_product(&m, "Nem", 35_000.0).await;
        let did = seed_discount(&m, "PEND", Some(5)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(did);
        let order = m.create_order(data).await.unwrap();
        m.set_status(order.id, OrderStatus::Cancelled).await.unwrap();

        let d = repository::discount::find_by_id(&m.pool, did)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.used_count, 0);
    }

    #[tokio::test]
    async fn delivered_records_customer_spending() {
        let m = manager().await;
        let pid = seed_product(&m, "Lẩu", 250_000.0).await;
        let tier = repository::customer_tier::create(
            &m.pool,
            CustomerTierCreate {
                name: "Silver".into(),
                minimum_spent: 200_000.0,
                color_hex: None,
                display_order: None,
            },
        )
        .await
        .unwrap();
        let customer = repository::customer::create(
            &m.pool,
            CustomerCreate {
                name: "An".into(),
                phone: None,
                email: None,
            },
        )
        .await
        .unwrap();

        let mut data = payload(pid, 1);
        data.customer_id = Some(customer.id);
        let order = m.create_order(data).await.unwrap();
        m.confirm_order(order.id).await.unwrap();
        m.set_status(order.id, OrderStatus::Preparing).await.unwrap();
        m.set_status(order.id, OrderStatus::Delivered).await.unwrap();

        let customer = repository::customer::find_by_id(&m.pool, customer.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(customer.total_spent, 250_000.0);
        assert_eq!(customer.tier_id, Some(tier.id));
    }

    #[tokio::test]
    async fn update_pending_recomputes_and_clears_discount() {
        let m = manager().await;
        let pid = seed_product(&m, "Bánh", 20_000.0).await;
        let did = seed_discount(&m, "CLR", None).await;

        let mut data = payload(pid, 2);
        data.discount_id = Some(did);
        let order = m.create_order(data).await.unwrap();
        assert_eq!(order.discount_amount, 4_000.0);

        let order = m
            .update_order(
                order.id,
                OrderUpdate {
                    items: Some(vec![OrderItemInput {
                        product_id: pid,
                        quantity: 5,
                        special_instructions: None,
                    }]),
                    clear_discount: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(order.sub_total, 100_000.0);
        assert_eq!(order.discount_id, None);
        assert_eq!(order.discount_amount, 0.0);
        assert_eq!(order.total_amount, 100_000.0);
    }

    #[tokio::test]
    async fn update_confirmed_rejects_item_edits() {
        let m = manager().await;
        let pid = seed_product(&m, "Súp", 55_000.0).await;
        let order = m.create_order(payload(pid, 1)).await.unwrap();
        m.confirm_order(order.id).await.unwrap();

        let err = m
            .update_order(
                order.id,
                OrderUpdate {
                    items: Some(vec![OrderItemInput {
                        product_id: pid,
                        quantity: 3,
                        special_instructions: None,
                    }]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotEditable(_)));
    }

    #[tokio::test]
    async fn update_confirmed_swaps_discount_reservation() {
        let m = manager().await;
        let pid = seed_product(&m, "Mì", 60_000.0).await;
        let old = seed_discount(&m, "OLD", Some(3)).await;
        let new = seed_discount(&m, "NEW", Some(3)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(old);
        let order = m.create_order(data).await.unwrap();
        m.confirm_order(order.id).await.unwrap();

        let order = m
            .update_order(
                order.id,
                OrderUpdate {
                    discount_id: Some(new),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(order.discount_id, Some(new));

        let old_d = repository::discount::find_by_id(&m.pool, old).await.unwrap().unwrap();
        let new_d = repository::discount::find_by_id(&m.pool, new).await.unwrap().unwrap();
        assert_eq!(old_d.used_count, 0);
        assert_eq!(new_d.used_count, 1);
    }

    #[tokio::test]
    async fn status_machine_rejects_skips_and_terminal_mutation() {
        let m = manager().await;
        let pid = seed_product(&m, "Gà", 90_000.0).await;
        let order = m.create_order(payload(pid, 1)).await.unwrap();

        let err = m.set_status(order.id, OrderStatus::Delivered).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));

        m.set_status(order.id, OrderStatus::Cancelled).await.unwrap();
        let err = m.set_status(order.id, OrderStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, OrderError::Terminal(..)));
    }

    #[tokio::test]
    async fn preview_prices_without_persisting() {
        let m = manager().await;
        let pid = seed_product(&m, "Ốc", 80_000.0).await;
        let preview = m.preview(payload(pid, 2)).await.unwrap();
        assert_eq!(preview.order.total_amount, 160_000.0);
        assert!(m.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_confirms_grant_exactly_one_slot() {
        // File-backed database so both tasks share state across connections
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("race.db");
        let db = crate::db::DbService::new(path.to_str().unwrap()).await.unwrap();
        let m = Arc::new(OrderManager::new(db.pool.clone(), PricingPolicy::default()));

        let pid = seed_product(&m, "Cua", 150_000.0).await;
        let did = seed_discount(&m, "RACE", Some(1)).await;

        let mut data = payload(pid, 1);
        data.discount_id = Some(did);
        let a = m.create_order(data.clone()).await.unwrap();
        let b = m.create_order(data).await.unwrap();

        let (ra, rb) = tokio::join!(
            {
                let m = m.clone();
                async move { m.confirm_order(a.id).await }
            },
            {
                let m = m.clone();
                async move { m.confirm_order(b.id).await }
            }
        );
        assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1);

        let d = repository::discount::find_by_id(&m.pool, did)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(d.used_count, 1);
    }
}
