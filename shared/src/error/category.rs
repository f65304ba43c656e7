//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Schedule errors
/// - 2xxx: Pricing errors
/// - 3xxx: Inventory errors
/// - 4xxx: Credit errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Schedule errors (1xxx)
    Schedule,
    /// Pricing errors (2xxx)
    Pricing,
    /// Inventory errors (3xxx)
    Inventory,
    /// Credit errors (4xxx)
    Credit,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Schedule,
            2000..3000 => Self::Pricing,
            3000..4000 => Self::Inventory,
            4000..5000 => Self::Credit,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Schedule => "schedule",
            Self::Pricing => "pricing",
            Self::Inventory => "inventory",
            Self::Credit => "credit",
            Self::System => "system",
        }
    }

    /// Whether errors of this category are user-recoverable within an editing session
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::System)
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1003), ErrorCategory::Schedule);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Pricing);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Inventory);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Credit);
        assert_eq!(ErrorCategory::from_code(7000), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::InvalidClock.category(), ErrorCategory::Schedule);
        assert_eq!(ErrorCode::StaleRuleSet.category(), ErrorCategory::Pricing);
        assert_eq!(ErrorCode::StockExceeded.category(), ErrorCategory::Inventory);
        assert_eq!(ErrorCode::CustomerNotFound.category(), ErrorCategory::Credit);
        assert_eq!(ErrorCode::StoreError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_recoverable() {
        assert!(ErrorCategory::Schedule.is_recoverable());
        assert!(ErrorCategory::Inventory.is_recoverable());
        assert!(!ErrorCategory::System.is_recoverable());
    }
}
