//! Scheduling
//!
//! Turns Master Records into concrete per-date occurrences.

mod recurrence;

pub use recurrence::*;
