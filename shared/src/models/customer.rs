//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer of a venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    pub phone: Option<String>,
    /// Monthly plan fee, zero for walk-in customers
    pub monthly_fee: f64,
    /// Stored credit balance (never negative), owned by the ledger
    pub credit_balance: f64,
}

impl Customer {
    /// Subscribers (any positive monthly fee) pay the monthly price variant
    pub fn is_subscriber(&self) -> bool {
        self.monthly_fee > 0.0
    }
}

/// Why the credit balance moved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerReason {
    /// Credit spent on a reservation
    ReservationPayment,
    /// Credit returned because an edit lowered the price below what was applied
    ReservationAdjustment,
    /// Credit returned on cancellation
    CancellationRefund,
    ManualGrant,
}

/// Ledger entry paired with an atomic balance change
///
/// `amount` is signed: negative debits the balance, positive credits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditLedgerEntry {
    pub id: i64,
    pub customer_id: i64,
    pub reservation_id: Option<i64>,
    pub amount: f64,
    pub reason: LedgerReason,
    pub created_at: i64,
}
