//! Credit settlement
//!
//! Decides how much stored customer credit a save newly consumes. Credit
//! already consumed by a previous save of the same reservation is never
//! charged against the balance again.

use crate::money::to_decimal;
use rust_decimal::Decimal;
use shared::models::{PaymentStatus, Reservation};

/// Inputs of a credit settlement
#[derive(Debug, Clone, Copy)]
pub struct CreditRequest {
    pub price_after_discount: Decimal,
    pub rental_cost: Decimal,
    /// Current balance, excluding credit already spent on this reservation
    pub customer_balance: Decimal,
    /// Credit spent on this reservation by earlier saves
    pub already_applied: Decimal,
    pub use_credit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreditOutcome {
    /// Amount to debit from the balance at save time
    pub newly_applied: Decimal,
    /// Credit carried by the reservation after the save
    pub total_applied: Decimal,
    /// Credit to give back because an edit lowered the price below it
    pub to_release: Decimal,
    pub final_payable: Decimal,
}

/// Settle credit for a reservation
pub fn apply_credit(request: &CreditRequest) -> CreditOutcome {
    let balance = request.customer_balance.max(Decimal::ZERO);
    let already = request.already_applied.max(Decimal::ZERO);

    let price_with_items = request.price_after_discount + request.rental_cost;
    let remaining = price_with_items - already;

    let newly_applied = if request.use_credit && remaining > Decimal::ZERO && balance > Decimal::ZERO {
        remaining.min(balance)
    } else {
        Decimal::ZERO
    };

    // A price drop below the credit already on the reservation hands the
    // surplus back instead of going negative
    let to_release = (already - price_with_items).max(Decimal::ZERO);
    let total_applied = already + newly_applied - to_release;
    let final_payable = price_with_items - total_applied;

    debug_assert!(newly_applied <= balance);
    debug_assert!(final_payable >= price_with_items - balance - already);
    debug_assert!(final_payable >= Decimal::ZERO);

    if !newly_applied.is_zero() || !to_release.is_zero() {
        tracing::debug!(
            newly_applied = %newly_applied,
            to_release = %to_release,
            final_payable = %final_payable,
            "Credit settled"
        );
    }

    CreditOutcome {
        newly_applied,
        total_applied,
        to_release,
        final_payable,
    }
}

/// Amount returned to the customer's credit when a reservation is cancelled
///
/// A paid reservation returns everything the customer spent on it (payable
/// plus credit); an unpaid one returns only the credit it consumed.
pub fn cancellation_refund(reservation: &Reservation) -> Decimal {
    let credit = to_decimal(reservation.credit_used).max(Decimal::ZERO);
    match reservation.payment_status {
        Some(PaymentStatus::Paid) => to_decimal(reservation.total_price).max(Decimal::ZERO) + credit,
        _ => credit,
    }
}
