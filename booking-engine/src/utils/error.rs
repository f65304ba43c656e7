//! Engine error type
//!
//! [`EngineError`] is what every fallible engine operation returns. Hosts that
//! speak the coded error protocol convert it into [`AppError`].
//!
//! Missing pricing rules and stale rule sets are not errors: they are carried
//! as warnings on the pricing result so the booking form keeps working.

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::types::{ClockParseError, ClockTime};
use std::fmt;
use thiserror::Error;

/// Persisted entity kinds referenced by [`EngineError::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Reservation,
    Court,
    Customer,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Reservation => "Reservation",
            Entity::Court => "Court",
            Entity::Customer => "Customer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid clock time: {0}")]
    InvalidClock(#[from] ClockParseError),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid interval on {date}: {start} to {end}")]
    InvalidInterval {
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
    },

    #[error("Invalid window: {from} is after {to}")]
    InvalidWindow { from: NaiveDate, to: NaiveDate },

    #[error("Stock exceeded for item {item_id}: requested {requested}, available {available}")]
    StockExceeded {
        item_id: i64,
        requested: u32,
        available: u32,
    },

    #[error("Invalid credit amount: {0}")]
    InvalidAmount(f64),

    #[error("Unknown rental item: {0}")]
    UnknownItem(i64),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: i64 },

    #[error("Store error: {0}")]
    Store(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::InvalidClock(_) => ErrorCode::InvalidClock,
            EngineError::InvalidDate(_) => ErrorCode::InvalidDate,
            EngineError::InvalidInterval { .. } => ErrorCode::InvalidInterval,
            EngineError::InvalidWindow { .. } => ErrorCode::InvalidWindow,
            EngineError::InvalidAmount(_) => ErrorCode::ValidationFailed,
            EngineError::StockExceeded { .. } => ErrorCode::StockExceeded,
            EngineError::UnknownItem(_) => ErrorCode::RentalItemNotFound,
            EngineError::NotFound { entity, .. } => match entity {
                Entity::Reservation => ErrorCode::MasterNotFound,
                Entity::Court => ErrorCode::CourtNotFound,
                Entity::Customer => ErrorCode::CustomerNotFound,
            },
            EngineError::Store(_) => ErrorCode::StoreError,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        let app = AppError::with_message(code, err.to_string());
        match err {
            EngineError::StockExceeded {
                item_id,
                requested,
                available,
            } => app
                .with_detail("item_id", item_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            EngineError::UnknownItem(item_id) => app.with_detail("item_id", item_id),
            EngineError::NotFound { id, .. } => app.with_detail("id", id),
            _ => app,
        }
    }
}
