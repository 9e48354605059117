//! Discount amount calculator
//!
//! Computes the monetary amount one eligible discount takes off an order,
//! and for Buy-X-Get-Y promotions synthesizes the granted free/discounted
//! line items. Pure function - callers are expected to have run the
//! eligibility filter first, but every path here is defensively safe and
//! degrades to a zero amount rather than failing.

use rust_decimal::prelude::*;
use shared::models::{Discount, DiscountType, FreeProductDiscountType};
use shared::order::OrderItem;

use super::catalog::Catalog;
use super::eligibility::{OrderContext, item_matches, qualifying_quantity};
use super::money::{round_money, to_decimal, to_f64};

/// Cap policy for Buy-X-Get-Y grants
///
/// An order of 40 qualifying units under a "buy 2 get 1" promotion would
/// otherwise grant 20 free units; how many make commercial sense is a
/// business decision, so the ceiling is configuration rather than a
/// hard-coded constant.
#[derive(Debug, Clone, Copy)]
pub struct BogoPolicy {
    /// Most free/discounted units a single order may be granted
    pub max_granted_units: i64,
}

impl Default for BogoPolicy {
    fn default() -> Self {
        Self {
            max_granted_units: 20,
        }
    }
}

/// Result of computing one discount against an order
#[derive(Debug, Clone, Default)]
pub struct DiscountOutcome {
    /// Monetary discount, rounded to whole đồng
    pub amount: f64,
    /// Synthesized free/discounted line items (BuyXGetY only). These are
    /// display/receipt artifacts; they never join the order's own item
    /// list or subtotal.
    pub free_items: Vec<OrderItem>,
}

/// Subtotal of the items covered by the discount's product/category
/// filters; the full subtotal when both filters are empty.
fn applicable_subtotal(discount: &Discount, items: &[OrderItem], catalog: &Catalog) -> Decimal {
    items
        .iter()
        .filter(|item| item_matches(discount, item, catalog))
        .map(|item| to_decimal(item.total_price))
        .sum()
}

/// Compute the discount amount for one discount and order context.
///
/// Rounding to whole đồng happens at the final amount only.
pub fn compute_discount(
    discount: &Discount,
    ctx: &OrderContext<'_>,
    catalog: &Catalog,
    policy: &BogoPolicy,
) -> DiscountOutcome {
    match discount.discount_type {
        DiscountType::Percentage => {
            let base = applicable_subtotal(discount, ctx.items, catalog);
            let mut amount = base * to_decimal(discount.discount_value) / Decimal::ONE_HUNDRED;
            if let Some(cap) = discount.max_discount_amount {
                amount = amount.min(to_decimal(cap));
            }
            // Never exceeds its base, never negative
            amount = amount.min(base).max(Decimal::ZERO);
            DiscountOutcome {
                amount: to_f64(amount),
                free_items: vec![],
            }
        }
        DiscountType::FixedAmount => {
            let base = applicable_subtotal(discount, ctx.items, catalog);
            let amount = to_decimal(discount.discount_value)
                .min(base)
                .max(Decimal::ZERO);
            DiscountOutcome {
                amount: to_f64(amount),
                free_items: vec![],
            }
        }
        DiscountType::BuyXGetY => compute_bogo(discount, ctx, catalog, policy),
    }
}

fn compute_bogo(
    discount: &Discount,
    ctx: &OrderContext<'_>,
    catalog: &Catalog,
    policy: &BogoPolicy,
) -> DiscountOutcome {
    let buy_quantity = discount.buy_quantity.unwrap_or(1).max(1);
    let multiples = qualifying_quantity(discount, ctx.items, catalog) / buy_quantity;
    if multiples == 0 {
        return DiscountOutcome::default();
    }

    // "Currently cannot be fulfilled" contributes zero, never an error
    let Some(free_id) = discount.free_product_id else {
        return DiscountOutcome::default();
    };
    let Some(free_product) = catalog.product(free_id) else {
        return DiscountOutcome::default();
    };
    if !free_product.is_active || !free_product.is_available {
        return DiscountOutcome::default();
    }

    let per_batch = discount.free_product_quantity.unwrap_or(1).max(1);
    let granted = (multiples * per_batch).min(policy.max_granted_units.max(0));
    if granted == 0 {
        return DiscountOutcome::default();
    }

    let unit_price = to_decimal(free_product.price);
    let granted_dec = Decimal::from(granted);
    let full_value = unit_price * granted_dec;

    let amount = match discount
        .free_product_discount_type
        .unwrap_or(FreeProductDiscountType::Free)
    {
        FreeProductDiscountType::Free => full_value,
        FreeProductDiscountType::Percentage => {
            full_value * to_decimal(discount.free_product_discount_value.unwrap_or(0.0))
                / Decimal::ONE_HUNDRED
        }
        FreeProductDiscountType::FixedAmount => {
            (to_decimal(discount.free_product_discount_value.unwrap_or(0.0)) * granted_dec)
                .min(full_value)
        }
    };
    let amount = amount.min(full_value).max(Decimal::ZERO);
    let amount = round_money(amount);

    // Granted units appear as one synthesized line at the reduced price
    let line_total = round_money(full_value - amount);
    let granted_unit = round_money(line_total / granted_dec);
    let free_item = OrderItem {
        product_id: free_id,
        product_name: free_product.name.clone(),
        quantity: granted as i32,
        unit_price: granted_unit.to_f64().unwrap_or_default(),
        total_price: line_total.to_f64().unwrap_or_default(),
        special_instructions: None,
    };

    DiscountOutcome {
        amount: amount.to_f64().unwrap_or_default(),
        free_items: vec![free_item],
    }
}
