//! Money helpers
//!
//! Amounts are stored as `f64` on models and computed as `Decimal`.
//! Rounding to 2 decimal places (half away from zero) happens only when a
//! final amount is handed back as `f64`.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Round to 2 decimal places
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Minutes expressed as fractional hours
#[inline]
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

/// Amount due for `minutes` at an hourly rate, unrounded
#[inline]
pub fn hourly_amount(rate_per_hour: Decimal, minutes: i64) -> Decimal {
    rate_per_hour * Decimal::from(minutes) / Decimal::from(60)
}
