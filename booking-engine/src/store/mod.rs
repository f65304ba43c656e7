//! External data layer
//!
//! The engine works on snapshots fetched through [`BookingStore`] and hands
//! computed reservations back through it. Persistence, transactions and the
//! authoritative credit balance live behind this trait.

mod memory;

pub use memory::MemoryStore;

use crate::schedule::DateWindow;
use crate::utils::EngineError;
use async_trait::async_trait;
use shared::models::{
    Court, Customer, DurationDiscount, LedgerReason, OccurrenceOverride, PricingRule, RentalItem,
    Reservation,
};
use thiserror::Error;

/// Data layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Data store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err.to_string())
    }
}

/// Credit handed back to a customer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditReturn {
    pub customer_id: i64,
    pub amount: f64,
}

/// A computed reservation ready to be persisted
///
/// The store applies the record and every balance change in one atomic
/// operation, each change paired with a ledger entry. Either all of it is
/// applied or none of it.
#[derive(Debug, Clone)]
pub struct ReservationCommit {
    /// `id == 0` inserts a new Master Record
    pub reservation: Reservation,
    /// Credit to take from the customer's balance
    pub credit_debit: f64,
    /// Credit to give back to the customer's balance
    pub credit_release: f64,
    /// Credit the record held for a customer it no longer belongs to
    pub previous_customer_credit: Option<CreditReturn>,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn fetch_pricing_rules(&self, venue_id: i64) -> StoreResult<Vec<PricingRule>>;

    async fn fetch_duration_discounts(&self, venue_id: i64) -> StoreResult<Vec<DurationDiscount>>;

    async fn fetch_rental_items(&self, venue_id: i64) -> StoreResult<Vec<RentalItem>>;

    async fn fetch_courts(&self, venue_id: i64) -> StoreResult<Vec<Court>>;

    /// Master Records that may have occurrences inside the window
    ///
    /// Recurring masters starting before the window must be included.
    async fn fetch_reservations(
        &self,
        venue_id: i64,
        window: DateWindow,
    ) -> StoreResult<Vec<Reservation>>;

    async fn fetch_overrides(
        &self,
        venue_id: i64,
        window: DateWindow,
    ) -> StoreResult<Vec<OccurrenceOverride>>;

    async fn fetch_reservation(&self, id: i64) -> StoreResult<Option<Reservation>>;

    async fn fetch_customer(&self, id: i64) -> StoreResult<Option<Customer>>;

    /// Persist a computed reservation, returns the stored record
    async fn commit_reservation(&self, commit: ReservationCommit) -> StoreResult<Reservation>;

    async fn insert_override(&self, record: OccurrenceOverride) -> StoreResult<()>;

    /// Atomically mark a reservation cancelled and credit `refund` to its
    /// customer, returns the amount refunded
    ///
    /// An already cancelled reservation is left alone and refunds nothing.
    /// A failed refund leaves the reservation untouched.
    async fn cancel_reservation(&self, id: i64, refund: f64) -> StoreResult<f64>;

    /// Atomically change a customer's balance, returns the new balance
    async fn adjust_credit(
        &self,
        customer_id: i64,
        amount: f64,
        reason: LedgerReason,
        reservation_id: Option<i64>,
    ) -> StoreResult<f64>;
}
