//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Amounts are in whole đồng, so final
//! rounding is to zero decimal places, half-up, and happens only at final
//! amounts - never at intermediate steps.

use crate::pricing::PricingError;
use rust_decimal::prelude::*;
use shared::order::OrderItemInput;

/// Smallest currency unit: whole đồng
const DECIMAL_PLACES: u32 = 0;

/// Maximum allowed unit price per item (100,000,000 ₫)
const MAX_PRICE: f64 = 100_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 999;
/// Maximum allowed delivery fee (10,000,000 ₫)
const MAX_DELIVERY_FEE: f64 = 10_000_000.0;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round a final amount to the smallest currency unit (half-up)
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a Decimal back to f64 for storage, rounded to whole đồng
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::Validation(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate an OrderItemInput before processing
pub fn validate_item_input(item: &OrderItemInput) -> Result<(), PricingError> {
    if item.quantity <= 0 {
        return Err(PricingError::Validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(PricingError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

/// Validate a product unit price snapshotted from the catalog
pub fn validate_unit_price(price: f64) -> Result<(), PricingError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(PricingError::Validation(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(PricingError::Validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate a delivery fee input
pub fn validate_delivery_fee(fee: f64) -> Result<(), PricingError> {
    require_finite(fee, "delivery_fee")?;
    if fee < 0.0 {
        return Err(PricingError::Validation(format!(
            "delivery_fee must be non-negative, got {fee}"
        )));
    }
    if fee > MAX_DELIVERY_FEE {
        return Err(PricingError::Validation(format!(
            "delivery_fee exceeds maximum allowed ({MAX_DELIVERY_FEE}), got {fee}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up_at_whole_dong() {
        assert_eq!(to_f64(to_decimal(1000.5)), 1001.0);
        assert_eq!(to_f64(to_decimal(1000.4)), 1000.0);
        assert_eq!(to_f64(to_decimal(999.99)), 1000.0);
    }

    #[test]
    fn test_accumulation_precision() {
        // Decimal does not drift where f64 would
        let mut total = Decimal::ZERO;
        for _ in 0..1000 {
            total += to_decimal(0.01);
        }
        assert_eq!(total, Decimal::from(10));
    }

    #[test]
    fn test_quantity_bounds() {
        let mut item = OrderItemInput {
            product_id: 1,
            quantity: 1,
            special_instructions: None,
        };
        assert!(validate_item_input(&item).is_ok());
        item.quantity = 0;
        assert!(validate_item_input(&item).is_err());
        item.quantity = -3;
        assert!(validate_item_input(&item).is_err());
        item.quantity = 1000;
        assert!(validate_item_input(&item).is_err());
    }

    #[test]
    fn test_price_must_be_finite_and_bounded() {
        assert!(validate_unit_price(45_000.0).is_ok());
        assert!(validate_unit_price(-1.0).is_err());
        assert!(validate_unit_price(f64::NAN).is_err());
        assert!(validate_unit_price(f64::INFINITY).is_err());
        assert!(validate_unit_price(MAX_PRICE + 1.0).is_err());
    }

    #[test]
    fn test_delivery_fee_bounds() {
        assert!(validate_delivery_fee(0.0).is_ok());
        assert!(validate_delivery_fee(15_000.0).is_ok());
        assert!(validate_delivery_fee(-1.0).is_err());
        assert!(validate_delivery_fee(f64::NAN).is_err());
    }
}
