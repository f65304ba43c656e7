//! Occurrence Model
//!
//! Occurrences are the concrete, date-bound instances of Master Records.
//! They are synthesized on read and never persisted; edits go to the master.

use super::rental_item::RentalSelection;
use super::reservation::{PaymentStatus, ReservationKind, ReservationStatus};
use crate::types::ClockTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of one date within a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceKey {
    pub series_id: i64,
    pub date: NaiveDate,
}

/// Concrete booking instance for one calendar date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    /// Back-reference to the Master Record; edits and cancellations route here
    pub master_id: i64,
    /// Synthesized from a recurring master (as opposed to a one-off booking)
    pub is_virtual: bool,
    pub venue_id: i64,
    pub court_id: i64,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub status: ReservationStatus,
    pub kind: ReservationKind,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub sport: String,
    pub total_price: f64,
    pub payment_status: Option<PaymentStatus>,
    pub credit_used: f64,
    pub rented_items: RentalSelection,
}

impl Occurrence {
    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            series_id: self.master_id,
            date: self.date,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverrideKind {
    /// This single date of the series is cancelled
    Cancelled,
}

/// Per-date override of a recurring series, keyed by `(series_id, date)`
///
/// Cancelling one date never touches the master's recurrence window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceOverride {
    pub id: i64,
    pub series_id: i64,
    pub date: NaiveDate,
    pub kind: OverrideKind,
    pub created_at: i64,
}

impl OccurrenceOverride {
    pub fn key(&self) -> OccurrenceKey {
        OccurrenceKey {
            series_id: self.series_id,
            date: self.date,
        }
    }
}

/// One expanded slot of a series: either scheduled or cancelled by override
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccurrenceEntry {
    Scheduled(Occurrence),
    CancelledOverride(OccurrenceOverride),
}

impl OccurrenceEntry {
    pub fn key(&self) -> OccurrenceKey {
        match self {
            Self::Scheduled(o) => o.key(),
            Self::CancelledOverride(o) => o.key(),
        }
    }

    pub fn scheduled(self) -> Option<Occurrence> {
        match self {
            Self::Scheduled(o) => Some(o),
            Self::CancelledOverride(_) => None,
        }
    }
}
