//! Error type shared between the engine and its collaborators

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (offending item, requested quantity, ...)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Result type using [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::InvalidInterval);
        assert_eq!(err.code, ErrorCode::InvalidInterval);
        assert_eq!(err.message, "End time must be after start time");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_with_detail() {
        let err = AppError::with_message(ErrorCode::StockExceeded, "Only 2 rackets left")
            .with_detail("item_id", 7)
            .with_detail("available", 2);
        let details = err.details.unwrap();
        assert_eq!(details.get("item_id"), Some(&Value::from(7)));
        assert_eq!(details.get("available"), Some(&Value::from(2)));
    }

    #[test]
    fn test_serialize_skips_empty_details() {
        let json = serde_json::to_value(AppError::new(ErrorCode::StoreError)).unwrap();
        assert_eq!(json["code"], 9002);
        assert!(json.get("details").is_none());
    }
}
