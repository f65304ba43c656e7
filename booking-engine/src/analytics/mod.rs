//! Occupancy and revenue analytics over expanded occurrences

mod occupancy;

pub use occupancy::*;
