//! Pricing Engine Module
//!
//! Prices a reservation segment by segment, applies the best duration
//! discount, adds rented items and settles customer credit.
//! Every step is a pure function over an already-fetched [`PricingCatalog`].

mod calculator;
mod credit;
mod discount;
pub mod matcher;
mod quote;

pub use calculator::*;
pub use credit::*;
pub use discount::*;
pub use matcher::*;
pub use quote::*;

use shared::models::{DurationDiscount, PricingRule};

/// Pricing rules and duration discounts of a venue, fetched together
#[derive(Debug, Clone, Default)]
pub struct PricingCatalog {
    pub rules: Vec<PricingRule>,
    pub discounts: Vec<DurationDiscount>,
}
