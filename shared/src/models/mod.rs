//! Data models
//!
//! Persisted venue data (courts, rules, discounts, rental items, customers,
//! reservations) plus the engine-synthesized occurrence types.
//! All IDs are `i64`.

pub mod court;
pub mod customer;
pub mod duration_discount;
pub mod occurrence;
pub mod pricing_rule;
pub mod rental_item;
pub mod reservation;

// Re-exports
pub use court::*;
pub use customer::*;
pub use duration_discount::*;
pub use occurrence::*;
pub use pricing_rule::*;
pub use rental_item::*;
pub use reservation::*;
