//! Duration Discount Model

use serde::{Deserialize, Serialize};

/// Percentage discount unlocked by booking at least `duration_hours`
///
/// Tiers never stack; the engine applies the single largest tier met.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationDiscount {
    pub id: i64,
    pub venue_id: i64,
    /// Minimum reservation length in hours
    pub duration_hours: f64,
    /// Discount percentage (10 = 10%)
    pub percentage: f64,
    pub is_active: bool,
}
