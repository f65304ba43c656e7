//! Unified error system for the booking engine
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Schedule errors
//! - 2xxx: Pricing errors
//! - 3xxx: Inventory errors
//! - 4xxx: Credit errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::StockExceeded, "Only 1 ball machine left")
//!     .with_detail("item_id", 4);
//! assert_eq!(err.code.category().name(), "inventory");
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
