//! Unified error codes for the booking engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Schedule errors (dates, clock times, intervals, recurrence)
//! - 2xxx: Pricing errors
//! - 3xxx: Inventory errors
//! - 4xxx: Credit errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the external data layer
/// and any frontend can match on them without string parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 1xxx: Schedule ====================
    /// Date string is not `YYYY-MM-DD`
    InvalidDate = 1001,
    /// Clock string is not `HH:MM`
    InvalidClock = 1002,
    /// End time is not after start time
    InvalidInterval = 1003,
    /// Query window ends before it starts
    InvalidWindow = 1004,
    /// Master record for an occurrence could not be found
    MasterNotFound = 1005,
    /// Court is not part of the venue catalog
    CourtNotFound = 1006,

    // ==================== 2xxx: Pricing ====================
    /// No pricing rule matched a segment
    NoApplicableRule = 2001,
    /// Rules or discounts could not be fetched
    StaleRuleSet = 2002,

    // ==================== 3xxx: Inventory ====================
    /// Requested rental quantity exceeds availability
    StockExceeded = 3001,
    /// Rental item is not part of the venue catalog
    RentalItemNotFound = 3002,

    // ==================== 4xxx: Credit ====================
    /// Customer record could not be found
    CustomerNotFound = 4001,
    /// Credit applied would exceed the available balance
    CreditOverrun = 4002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// External data store error
    StoreError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            // Schedule
            ErrorCode::InvalidDate => "Invalid date, expected YYYY-MM-DD",
            ErrorCode::InvalidClock => "Invalid time, expected HH:MM",
            ErrorCode::InvalidInterval => "End time must be after start time",
            ErrorCode::InvalidWindow => "Window end must not be before window start",
            ErrorCode::MasterNotFound => "Reservation series not found",
            ErrorCode::CourtNotFound => "Court not found",

            // Pricing
            ErrorCode::NoApplicableRule => "No pricing rule applies to this time",
            ErrorCode::StaleRuleSet => "Pricing rules could not be loaded",

            // Inventory
            ErrorCode::StockExceeded => "Requested quantity exceeds available stock",
            ErrorCode::RentalItemNotFound => "Rental item not found",

            // Credit
            ErrorCode::CustomerNotFound => "Customer not found",
            ErrorCode::CreditOverrun => "Credit applied exceeds available balance",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::StoreError => "Data store error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Schedule
            1001 => Ok(ErrorCode::InvalidDate),
            1002 => Ok(ErrorCode::InvalidClock),
            1003 => Ok(ErrorCode::InvalidInterval),
            1004 => Ok(ErrorCode::InvalidWindow),
            1005 => Ok(ErrorCode::MasterNotFound),
            1006 => Ok(ErrorCode::CourtNotFound),

            // Pricing
            2001 => Ok(ErrorCode::NoApplicableRule),
            2002 => Ok(ErrorCode::StaleRuleSet),

            // Inventory
            3001 => Ok(ErrorCode::StockExceeded),
            3002 => Ok(ErrorCode::RentalItemNotFound),

            // Credit
            4001 => Ok(ErrorCode::CustomerNotFound),
            4002 => Ok(ErrorCode::CreditOverrun),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StoreError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::InvalidInterval.code(), 1003);
        assert_eq!(ErrorCode::StockExceeded.code(), 3001);
        assert_eq!(ErrorCode::StoreError.code(), 9002);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(2001), Ok(ErrorCode::NoApplicableRule));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::CreditOverrun));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(2999), Err(InvalidErrorCode(2999)));
        assert_eq!(ErrorCode::try_from(4), Err(InvalidErrorCode(4)));
        assert_eq!(ErrorCode::try_from(9005), Err(InvalidErrorCode(9005)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::StockExceeded).unwrap();
        assert_eq!(json, "3001");
        let parsed: ErrorCode = serde_json::from_str("1003").unwrap();
        assert_eq!(parsed, ErrorCode::InvalidInterval);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }
}
