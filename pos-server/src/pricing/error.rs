//! Pricing error taxonomy
//!
//! Every way a discount can fail to apply gets its own reason so the UI
//! can tell the cashier *why* (expired vs. exhausted vs. wrong tier),
//! rather than a generic "not applicable".

use serde::Serialize;

/// Why a discount is not eligible for an order context
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IneligibleReason {
    /// Manually disabled by an admin
    Inactive,
    /// Validity window has not opened yet
    NotStarted,
    /// Validity window has closed
    Expired,
    /// used_count has reached usage_limit
    UsageExhausted,
    /// Order subtotal is below min_order_amount
    MinimumOrderNotMet,
    /// Discount targets specific tiers and the order's tier is absent or not targeted
    TierNotEligible,
    /// Discount targets specific employee roles and the order's role is absent or not targeted
    RoleNotEligible,
    /// No order item matches the product/category filters
    NoMatchingItems,
    /// BuyXGetY: not enough qualifying units for a single batch
    BuyQuantityNotMet,
    /// BuyXGetY: the designated free product is missing, inactive or unavailable
    FreeProductUnavailable,
}

impl std::fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            IneligibleReason::Inactive => "discount is disabled",
            IneligibleReason::NotStarted => "discount is not active yet",
            IneligibleReason::Expired => "discount has expired",
            IneligibleReason::UsageExhausted => "discount usage limit has been reached",
            IneligibleReason::MinimumOrderNotMet => "order does not meet the minimum amount",
            IneligibleReason::TierNotEligible => "discount is not available for this customer tier",
            IneligibleReason::RoleNotEligible => "discount is not available for this employee role",
            IneligibleReason::NoMatchingItems => "no order items qualify for this discount",
            IneligibleReason::BuyQuantityNotMet => "not enough qualifying items for this promotion",
            IneligibleReason::FreeProductUnavailable => "promotion product is currently unavailable",
        };
        f.write_str(msg)
    }
}

/// Pricing layer errors
///
/// All variants except `Invariant` are recoverable at the caller level:
/// the order stays in its prior valid state and nothing is persisted.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// Malformed input, rejected before any computation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Discount exists but fails an eligibility check at evaluation time
    #[error("discount not applicable: {0}")]
    NotApplicable(IneligibleReason),

    /// Lost the atomic usage-increment race at confirmation
    #[error("discount usage limit reached")]
    Exhausted,

    /// Internal invariant violation - a bug, never shown to end users
    #[error("pricing invariant violated: {0}")]
    Invariant(String),
}
