//! Reservation Model
//!
//! A persisted reservation is the Master Record of a booking. When it carries
//! a [`Recurrence`] it stands for a whole series; its per-day instances are
//! synthesized by the engine and never stored.

use super::rental_item::{RentalSelection, RentedItem};
use crate::types::ClockTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// What the court time is used for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationKind {
    Ordinary,
    Class,
    Tournament,
    Block,
    Event,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Recurrence cadence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cadence {
    Daily,
    /// Same weekday as the master's first date
    Weekly,
}

/// Recurrence metadata of a Master Record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub cadence: Cadence,
    /// Last date of the series (inclusive), open-ended when absent
    pub end_date: Option<NaiveDate>,
}

/// Reservation entity (Master Record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub venue_id: i64,
    pub court_id: i64,
    /// Registered customer, absent for walk-ins typed by name
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub sport: String,
    /// First (or only) date of the booking
    pub date: NaiveDate,
    pub start_time: ClockTime,
    /// At or before `start_time` means the booking ends the next day
    pub end_time: ClockTime,
    pub status: ReservationStatus,
    pub kind: ReservationKind,
    pub recurrence: Option<Recurrence>,
    /// Final payable amount computed at save time
    pub total_price: f64,
    pub payment_status: Option<PaymentStatus>,
    /// Total customer credit consumed by this reservation so far
    pub credit_used: f64,
    #[serde(default)]
    pub rented_items: RentalSelection,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl Reservation {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ReservationStatus::Cancelled
    }
}

/// Editable reservation fields as collected from the booking form
///
/// `id` is present when editing an existing Master Record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub id: Option<i64>,
    pub venue_id: i64,
    pub court_id: i64,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub sport: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub status: ReservationStatus,
    pub kind: ReservationKind,
    pub recurrence: Option<Recurrence>,
    /// Pay part of the price from the customer's stored credit
    pub use_credit: bool,
    #[serde(default)]
    pub rented_items: Vec<RentedItem>,
    pub notes: Option<String>,
}

impl ReservationDraft {
    /// Draft pre-filled from an existing Master Record, for editing
    pub fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            id: Some(reservation.id),
            venue_id: reservation.venue_id,
            court_id: reservation.court_id,
            customer_id: reservation.customer_id,
            customer_name: reservation.customer_name.clone(),
            customer_phone: reservation.customer_phone.clone(),
            sport: reservation.sport.clone(),
            date: reservation.date,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            status: reservation.status,
            kind: reservation.kind,
            recurrence: reservation.recurrence.clone(),
            use_credit: reservation.credit_used > 0.0,
            rented_items: reservation.rented_items.items().to_vec(),
            notes: reservation.notes.clone(),
        }
    }
}
