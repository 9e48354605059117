//! Discount eligibility filter
//!
//! Structural applicability of a discount to an order context, independent
//! of the computed monetary amount. Checks run in a fixed order and
//! short-circuit on the first failure so the returned reason is the
//! earliest gate the discount missed.

use crate::pricing::catalog::Catalog;
use crate::pricing::error::IneligibleReason;
use shared::models::{Discount, DiscountType};
use shared::order::OrderItem;

/// Snapshot of the order fields eligibility depends on
#[derive(Debug, Clone, Copy)]
pub struct OrderContext<'a> {
    pub items: &'a [OrderItem],
    pub sub_total: f64,
    pub customer_tier_id: Option<i64>,
    pub employee_role_id: Option<i64>,
}

impl<'a> OrderContext<'a> {
    pub fn of(order: &'a shared::order::Order) -> Self {
        Self {
            items: &order.items,
            sub_total: order.sub_total,
            customer_tier_id: order.customer_tier_id,
            employee_role_id: order.employee_role_id,
        }
    }
}

/// Whether a single item falls under the discount's product/category filters.
///
/// Both filters empty means the discount covers every item. With filters
/// present, matching either one is enough; an item whose product is absent
/// from the catalog cannot match the category filter.
pub fn item_matches(discount: &Discount, item: &OrderItem, catalog: &Catalog) -> bool {
    let by_product = !discount.applicable_product_ids.is_empty();
    let by_category = !discount.applicable_category_ids.is_empty();

    if !by_product && !by_category {
        return true;
    }

    if by_product && discount.applicable_product_ids.contains(&item.product_id) {
        return true;
    }

    if by_category
        && let Some(category_id) = catalog.category_of(item.product_id)
        && discount.applicable_category_ids.contains(&category_id)
    {
        return true;
    }

    false
}

/// Total quantity of order items covered by the discount's filters
pub fn qualifying_quantity(discount: &Discount, items: &[OrderItem], catalog: &Catalog) -> i64 {
    items
        .iter()
        .filter(|item| item_matches(discount, item, catalog))
        .map(|item| item.quantity as i64)
        .sum()
}

/// Run the full eligibility check for one discount against an order context.
///
/// Check order: structural validity, minimum order, customer tier,
/// employee role, product/category coverage, BuyXGetY quantity threshold.
/// Tier/role checks fail closed: a discount that targets specific tiers or
/// roles is not eligible when the order has no identified tier or role.
pub fn check(
    discount: &Discount,
    ctx: &OrderContext<'_>,
    catalog: &Catalog,
    now: i64,
) -> Result<(), IneligibleReason> {
    // 1. Structural validity, split out so the caller learns which gate failed
    if !discount.is_active {
        return Err(IneligibleReason::Inactive);
    }
    if now < discount.start_date {
        return Err(IneligibleReason::NotStarted);
    }
    if now > discount.end_date {
        return Err(IneligibleReason::Expired);
    }
    if let Some(limit) = discount.usage_limit
        && discount.used_count >= limit
    {
        return Err(IneligibleReason::UsageExhausted);
    }

    // 2. Subtotal floor
    if let Some(min) = discount.min_order_amount
        && ctx.sub_total < min
    {
        return Err(IneligibleReason::MinimumOrderNotMet);
    }

    // 3. Customer tier (fail closed when the order has no identified tier)
    if !discount.applicable_customer_tier_ids.is_empty() {
        match ctx.customer_tier_id {
            Some(tier) if discount.applicable_customer_tier_ids.contains(&tier) => {}
            _ => return Err(IneligibleReason::TierNotEligible),
        }
    }

    // 4. Employee role (same fail-closed policy)
    if !discount.applicable_employee_role_ids.is_empty() {
        match ctx.employee_role_id {
            Some(role) if discount.applicable_employee_role_ids.contains(&role) => {}
            _ => return Err(IneligibleReason::RoleNotEligible),
        }
    }

    // 5/6. Product/category coverage: at least one item must match
    if !ctx.items.iter().any(|i| item_matches(discount, i, catalog)) {
        return Err(IneligibleReason::NoMatchingItems);
    }

    // 7. BuyXGetY threshold and fulfillability
    if discount.discount_type == DiscountType::BuyXGetY {
        let buy_quantity = discount.buy_quantity.unwrap_or(1).max(1);
        if qualifying_quantity(discount, ctx.items, catalog) < buy_quantity {
            return Err(IneligibleReason::BuyQuantityNotMet);
        }
        match discount.free_product_id {
            Some(free_id) if catalog.is_sellable(free_id) => {}
            _ => return Err(IneligibleReason::FreeProductUnavailable),
        }
    }

    Ok(())
}

/// All structurally eligible candidates among `discounts`, input order preserved
pub fn find_applicable<'a>(
    discounts: &'a [Discount],
    ctx: &OrderContext<'_>,
    catalog: &Catalog,
    now: i64,
) -> Vec<&'a Discount> {
    discounts
        .iter()
        .filter(|d| check(d, ctx, catalog, now).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::catalog::ProductMeta;
    use shared::models::FreeProductDiscountType;

    const NOW: i64 = 1_700_000_000_000;

    fn catalog() -> Catalog {
        let mut c = Catalog::new();
        // product 1/2 in category 10, product 3 in category 20
        for (id, category_id, price) in [(1, 10, 50_000.0), (2, 10, 30_000.0), (3, 20, 80_000.0)] {
            c.insert(
                id,
                ProductMeta {
                    name: format!("product-{id}"),
                    price,
                    category_id,
                    is_active: true,
                    is_available: true,
                },
            );
        }
        c
    }

    fn item(product_id: i64, quantity: i32, unit_price: f64) -> OrderItem {
        OrderItem {
            product_id,
            product_name: format!("product-{product_id}"),
            quantity,
            unit_price,
            total_price: unit_price * quantity as f64,
            special_instructions: None,
        }
    }

    fn discount() -> Discount {
        Discount {
            id: 1,
            code: "TEST".into(),
            name: "Test".into(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_order_amount: None,
            max_discount_amount: None,
            start_date: NOW - 1_000,
            end_date: NOW + 1_000,
            usage_limit: None,
            used_count: 0,
            applicable_product_ids: vec![],
            applicable_category_ids: vec![],
            applicable_customer_tier_ids: vec![],
            applicable_employee_role_ids: vec![],
            buy_quantity: None,
            free_product_id: None,
            free_product_quantity: None,
            free_product_discount_type: None,
            free_product_discount_value: None,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ctx_for(items: &[OrderItem]) -> OrderContext<'_> {
        let sub_total = items.iter().map(|i| i.total_price).sum();
        OrderContext {
            items,
            sub_total,
            customer_tier_id: None,
            employee_role_id: None,
        }
    }

    #[test]
    fn unrestricted_discount_is_eligible() {
        let items = [item(1, 1, 50_000.0)];
        assert!(check(&discount(), &ctx_for(&items), &catalog(), NOW).is_ok());
    }

    #[test]
    fn minimum_order_gate() {
        let mut d = discount();
        d.min_order_amount = Some(100_000.0);
        let items = [item(1, 1, 99_999.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::MinimumOrderNotMet)
        );
        let items = [item(1, 2, 50_000.0)];
        assert!(check(&d, &ctx_for(&items), &catalog(), NOW).is_ok());
    }

    #[test]
    fn unknown_tier_fails_closed() {
        let mut d = discount();
        d.applicable_customer_tier_ids = vec![3];
        let items = [item(1, 1, 50_000.0)];
        // No identified customer/tier on the order
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::TierNotEligible)
        );
        // Wrong tier also fails
        let mut ctx = ctx_for(&items);
        ctx.customer_tier_id = Some(2);
        assert_eq!(
            check(&d, &ctx, &catalog(), NOW),
            Err(IneligibleReason::TierNotEligible)
        );
        // Targeted tier passes
        ctx.customer_tier_id = Some(3);
        assert!(check(&d, &ctx, &catalog(), NOW).is_ok());
    }

    #[test]
    fn unknown_role_fails_closed() {
        let mut d = discount();
        d.applicable_employee_role_ids = vec![7];
        let items = [item(1, 1, 50_000.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::RoleNotEligible)
        );
        let mut ctx = ctx_for(&items);
        ctx.employee_role_id = Some(7);
        assert!(check(&d, &ctx, &catalog(), NOW).is_ok());
    }

    #[test]
    fn date_window_gates() {
        let d = discount();
        let items = [item(1, 1, 50_000.0)];
        let ctx = ctx_for(&items);
        assert_eq!(
            check(&d, &ctx, &catalog(), d.start_date - 1),
            Err(IneligibleReason::NotStarted)
        );
        assert_eq!(
            check(&d, &ctx, &catalog(), d.end_date + 1),
            Err(IneligibleReason::Expired)
        );
        // Inclusive bounds
        assert!(check(&d, &ctx, &catalog(), d.start_date).is_ok());
        assert!(check(&d, &ctx, &catalog(), d.end_date).is_ok());
    }

    #[test]
    fn usage_limit_gate() {
        let mut d = discount();
        d.usage_limit = Some(2);
        d.used_count = 2;
        let items = [item(1, 1, 50_000.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::UsageExhausted)
        );
    }

    #[test]
    fn product_filter_needs_one_matching_item() {
        let mut d = discount();
        d.applicable_product_ids = vec![3];
        let items = [item(1, 1, 50_000.0), item(2, 1, 30_000.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::NoMatchingItems)
        );
        let items = [item(1, 1, 50_000.0), item(3, 1, 80_000.0)];
        assert!(check(&d, &ctx_for(&items), &catalog(), NOW).is_ok());
    }

    #[test]
    fn product_or_category_filter_either_is_enough() {
        let mut d = discount();
        // Targets product 1 OR anything in category 20
        d.applicable_product_ids = vec![1];
        d.applicable_category_ids = vec![20];
        let items = [item(3, 1, 80_000.0)]; // category 20, not product 1
        assert!(check(&d, &ctx_for(&items), &catalog(), NOW).is_ok());
        let items = [item(1, 1, 50_000.0)]; // product 1, category 10
        assert!(check(&d, &ctx_for(&items), &catalog(), NOW).is_ok());
        let items = [item(2, 1, 30_000.0)]; // neither
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::NoMatchingItems)
        );
    }

    fn bogo() -> Discount {
        let mut d = discount();
        d.discount_type = DiscountType::BuyXGetY;
        d.discount_value = 0.0;
        d.applicable_product_ids = vec![1];
        d.buy_quantity = Some(2);
        d.free_product_id = Some(2);
        d.free_product_quantity = Some(1);
        d.free_product_discount_type = Some(FreeProductDiscountType::Free);
        d
    }

    #[test]
    fn bogo_quantity_threshold() {
        let d = bogo();
        let items = [item(1, 1, 50_000.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &catalog(), NOW),
            Err(IneligibleReason::BuyQuantityNotMet)
        );
        let items = [item(1, 2, 50_000.0)];
        assert!(check(&d, &ctx_for(&items), &catalog(), NOW).is_ok());
    }

    #[test]
    fn bogo_unavailable_free_product() {
        let d = bogo();
        let mut cat = catalog();
        cat.insert(
            2,
            ProductMeta {
                name: "product-2".into(),
                price: 30_000.0,
                category_id: 10,
                is_active: true,
                is_available: false,
            },
        );
        let items = [item(1, 2, 50_000.0)];
        assert_eq!(
            check(&d, &ctx_for(&items), &cat, NOW),
            Err(IneligibleReason::FreeProductUnavailable)
        );
    }

    #[test]
    fn find_applicable_filters_and_preserves_order() {
        let valid = discount();
        let mut gated = discount();
        gated.id = 2;
        gated.min_order_amount = Some(1_000_000.0);
        let mut expired = discount();
        expired.id = 3;
        expired.end_date = NOW - 1;
        let all = vec![valid, gated, expired];

        let items = [item(1, 1, 50_000.0)];
        let eligible = find_applicable(&all, &ctx_for(&items), &catalog(), NOW);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, 1);
    }
}
