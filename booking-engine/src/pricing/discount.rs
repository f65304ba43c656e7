//! Duration Discount
//!
//! Tiers never stack: only the active tier with the largest threshold the
//! booking still reaches applies.

use crate::money::to_decimal;
use rust_decimal::Decimal;
use shared::models::DurationDiscount;

/// Applied duration discount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscountOutcome {
    pub discount_id: Option<i64>,
    /// Percentage applied (10 = 10%)
    pub percentage: Decimal,
    /// Unrounded amount taken off the subtotal
    pub amount: Decimal,
}

/// Pick the best qualifying tier
///
/// Equal thresholds resolve to the larger percentage.
pub fn best_discount(
    duration_hours: Decimal,
    discounts: &[DurationDiscount],
) -> Option<&DurationDiscount> {
    discounts
        .iter()
        .filter(|d| d.is_active && duration_hours >= to_decimal(d.duration_hours))
        .max_by(|a, b| {
            to_decimal(a.duration_hours)
                .cmp(&to_decimal(b.duration_hours))
                .then(to_decimal(a.percentage).cmp(&to_decimal(b.percentage)))
        })
}

/// Apply the best tier to a court subtotal
pub fn apply_discount(
    subtotal: Decimal,
    duration_hours: Decimal,
    discounts: &[DurationDiscount],
) -> DiscountOutcome {
    let Some(tier) = best_discount(duration_hours, discounts) else {
        return DiscountOutcome::default();
    };

    // Percentages outside 0..=100 are clamped
    let percentage = to_decimal(tier.percentage).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    DiscountOutcome {
        discount_id: Some(tier.id),
        percentage,
        amount: subtotal * percentage / Decimal::ONE_HUNDRED,
    }
}
