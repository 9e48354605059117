//! Order total calculator
//!
//! Composes subtotal, VAT, delivery fee and the selected discount into the
//! order's authoritative `total_amount`. Owns the rounding and
//! floor-at-zero policy. Re-validates the selected discount on every run:
//! a discount can expire or flip inactive between selection and
//! confirmation, and a stale client selection must be rejected here, not
//! trusted.

use rust_decimal::prelude::*;
use shared::models::Discount;
use shared::order::Order;

use super::calculator::{BogoPolicy, DiscountOutcome, compute_discount};
use super::catalog::Catalog;
use super::eligibility::{OrderContext, check};
use super::error::PricingError;
use super::money::{round_money, to_decimal, to_f64};

/// Business knobs for the total computation
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    /// VAT rate applied when the order opts in (0.10 = 10%)
    pub vat_rate: f64,
    pub bogo: BogoPolicy,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            vat_rate: 0.10,
            bogo: BogoPolicy::default(),
        }
    }
}

/// Recompute all monetary fields of an order in place.
///
/// Steps, in order: line totals and subtotal from the item snapshots, VAT
/// (opt-in), delivery fee pass-through, discount amount (after a fresh
/// eligibility check), then `total_amount = max(0, sub_total + tax_amount
/// + delivery_fee - discount_amount)`.
///
/// Returns the discount outcome so callers can surface synthesized
/// Buy-X-Get-Y line items. Idempotent: a second run with no intervening
/// mutation produces identical fields.
pub fn recompute(
    order: &mut Order,
    discount: Option<&Discount>,
    catalog: &Catalog,
    policy: &PricingPolicy,
    now: i64,
) -> Result<DiscountOutcome, PricingError> {
    // 1. Line totals and subtotal
    let mut sub_total = Decimal::ZERO;
    for item in &mut order.items {
        let line = to_decimal(item.unit_price) * Decimal::from(item.quantity);
        let line = round_money(line);
        item.total_price = line.to_f64().unwrap_or_default();
        sub_total += line;
    }
    if sub_total < Decimal::ZERO {
        // Item validation should make this impossible
        return Err(PricingError::Invariant(format!(
            "negative subtotal {sub_total} for order {}",
            order.id
        )));
    }
    order.sub_total = to_f64(sub_total);

    // 2. VAT is an explicit opt-in per order
    let tax = if order.include_vat {
        round_money(sub_total * to_decimal(policy.vat_rate))
    } else {
        Decimal::ZERO
    };
    order.tax_amount = tax.to_f64().unwrap_or_default();

    // 3. Delivery fee is a business input, already validated upstream
    let delivery_fee = to_decimal(order.delivery_fee);

    // 4. Discount amount, re-validated against the current order state
    let outcome = match discount {
        Some(d) => {
            let ctx = OrderContext {
                items: &order.items,
                sub_total: order.sub_total,
                customer_tier_id: order.customer_tier_id,
                employee_role_id: order.employee_role_id,
            };
            check(d, &ctx, catalog, now).map_err(PricingError::NotApplicable)?;
            let outcome = compute_discount(d, &ctx, catalog, &policy.bogo);
            order.discount_id = Some(d.id);
            order.discount_amount = outcome.amount;
            outcome
        }
        None => {
            order.discount_id = None;
            order.discount_amount = 0.0;
            DiscountOutcome::default()
        }
    };

    // 5. Final total, floored at zero
    let total = sub_total + tax + delivery_fee - to_decimal(order.discount_amount);
    order.total_amount = to_f64(total.max(Decimal::ZERO));

    Ok(outcome)
}
