//! Utility modules

pub mod error;
pub mod logger;
pub mod time;

pub use error::{EngineError, EngineResult, Entity};
