//! Rental inventory
//!
//! Availability is derived per time window from the occurrences that hold
//! items; it is never stored.

mod availability;

pub use availability::*;
