//! Shared types for the booking engine
//!
//! Domain models, the error code table and small value types used by the
//! engine and by any surface (API, UI bridge) that talks to it.

pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
