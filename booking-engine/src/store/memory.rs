//! In-process [`BookingStore`]
//!
//! Keeps everything in memory. Used by tests and by hosts embedding the
//! engine without a remote data layer.

use super::{BookingStore, ReservationCommit, StoreError, StoreResult};
use crate::money::{to_decimal, to_f64};
use crate::schedule::{DateWindow, candidate_dates};
use crate::utils::logger::LEDGER_TARGET;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use shared::models::{
    Court, CreditLedgerEntry, Customer, DurationDiscount, LedgerReason, OccurrenceKey,
    OccurrenceOverride, PricingRule, RentalItem, Reservation, ReservationStatus,
};
use shared::util::{now_millis, snowflake_id};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

/// Customer, signed amount, ledger reason
type BalanceChange = (i64, Decimal, LedgerReason);

fn negative_balance(customer_id: i64) -> StoreError {
    StoreError::Conflict(format!(
        "credit balance of customer {} would become negative",
        customer_id
    ))
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: RwLock<Vec<PricingRule>>,
    discounts: RwLock<Vec<DurationDiscount>>,
    items: RwLock<Vec<RentalItem>>,
    courts: RwLock<Vec<Court>>,
    reservations: DashMap<i64, Reservation>,
    overrides: DashMap<OccurrenceKey, OccurrenceOverride>,
    customers: DashMap<i64, Customer>,
    ledger: RwLock<Vec<CreditLedgerEntry>>,
    /// Serializes balance changes with the records they belong to
    commit_lock: Mutex<()>,
    /// Simulates a failing pricing fetch
    pricing_unavailable: AtomicBool,
    last_reservation_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding ====================

    pub fn add_rule(&self, rule: PricingRule) {
        self.rules.write().push(rule);
    }

    pub fn add_discount(&self, discount: DurationDiscount) {
        self.discounts.write().push(discount);
    }

    pub fn add_item(&self, item: RentalItem) {
        self.items.write().push(item);
    }

    pub fn add_court(&self, court: Court) {
        self.courts.write().push(court);
    }

    pub fn add_customer(&self, customer: Customer) {
        self.customers.insert(customer.id, customer);
    }

    pub fn add_reservation(&self, reservation: Reservation) {
        self.last_reservation_id
            .fetch_max(reservation.id, Ordering::SeqCst);
        self.reservations.insert(reservation.id, reservation);
    }

    /// Make rule and discount fetches fail
    pub fn set_pricing_unavailable(&self, unavailable: bool) {
        self.pricing_unavailable.store(unavailable, Ordering::SeqCst);
    }

    // ==================== Inspection ====================

    pub fn customer(&self, id: i64) -> Option<Customer> {
        self.customers.get(&id).map(|c| c.clone())
    }

    pub fn reservation(&self, id: i64) -> Option<Reservation> {
        self.reservations.get(&id).map(|r| r.clone())
    }

    pub fn ledger_for(&self, customer_id: i64) -> Vec<CreditLedgerEntry> {
        self.ledger
            .read()
            .iter()
            .filter(|e| e.customer_id == customer_id)
            .cloned()
            .collect()
    }

    fn check_pricing_available(&self) -> StoreResult<()> {
        if self.pricing_unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("pricing tables".into()));
        }
        Ok(())
    }

    /// Verify a batch of balance changes can be applied in full; caller holds `commit_lock`
    fn check_balance_changes(&self, changes: &[BalanceChange]) -> StoreResult<()> {
        let mut net: BTreeMap<i64, Decimal> = BTreeMap::new();
        for (customer_id, amount, _) in changes {
            *net.entry(*customer_id).or_default() += *amount;
        }
        for (customer_id, amount) in net {
            let balance = self
                .customers
                .get(&customer_id)
                .map(|c| to_decimal(c.credit_balance))
                .ok_or_else(|| StoreError::NotFound(format!("customer {}", customer_id)))?;
            if balance + amount < Decimal::ZERO {
                return Err(negative_balance(customer_id));
            }
        }
        Ok(())
    }

    /// Apply a signed balance change and record it; caller holds `commit_lock`
    fn apply_balance_change(
        &self,
        customer_id: i64,
        amount: Decimal,
        reason: LedgerReason,
        reservation_id: Option<i64>,
    ) -> StoreResult<f64> {
        let mut customer = self
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| StoreError::NotFound(format!("customer {}", customer_id)))?;

        let balance = to_decimal(customer.credit_balance) + amount;
        if balance < Decimal::ZERO {
            return Err(negative_balance(customer_id));
        }
        customer.credit_balance = to_f64(balance);

        let entry = CreditLedgerEntry {
            id: snowflake_id(),
            customer_id,
            reservation_id,
            amount: to_f64(amount),
            reason,
            created_at: now_millis(),
        };
        tracing::info!(
            target: LEDGER_TARGET,
            customer_id,
            reservation_id = ?reservation_id,
            amount = entry.amount,
            balance = customer.credit_balance,
            reason = ?reason,
            "Credit balance changed"
        );
        self.ledger.write().push(entry);
        Ok(customer.credit_balance)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn fetch_pricing_rules(&self, venue_id: i64) -> StoreResult<Vec<PricingRule>> {
        self.check_pricing_available()?;
        Ok(self
            .rules
            .read()
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn fetch_duration_discounts(&self, venue_id: i64) -> StoreResult<Vec<DurationDiscount>> {
        self.check_pricing_available()?;
        Ok(self
            .discounts
            .read()
            .iter()
            .filter(|d| d.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn fetch_rental_items(&self, venue_id: i64) -> StoreResult<Vec<RentalItem>> {
        Ok(self
            .items
            .read()
            .iter()
            .filter(|i| i.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn fetch_courts(&self, venue_id: i64) -> StoreResult<Vec<Court>> {
        Ok(self
            .courts
            .read()
            .iter()
            .filter(|c| c.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn fetch_reservations(
        &self,
        venue_id: i64,
        window: DateWindow,
    ) -> StoreResult<Vec<Reservation>> {
        let mut found: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.venue_id == venue_id && !candidate_dates(r, &window).is_empty())
            .map(|r| r.clone())
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }

    async fn fetch_overrides(
        &self,
        venue_id: i64,
        window: DateWindow,
    ) -> StoreResult<Vec<OccurrenceOverride>> {
        Ok(self
            .overrides
            .iter()
            .filter(|o| {
                window.contains(o.date)
                    && self
                        .reservations
                        .get(&o.series_id)
                        .is_some_and(|r| r.venue_id == venue_id)
            })
            .map(|o| o.clone())
            .collect())
    }

    async fn fetch_reservation(&self, id: i64) -> StoreResult<Option<Reservation>> {
        Ok(self.reservation(id))
    }

    async fn fetch_customer(&self, id: i64) -> StoreResult<Option<Customer>> {
        Ok(self.customer(id))
    }

    async fn commit_reservation(&self, commit: ReservationCommit) -> StoreResult<Reservation> {
        let _guard = self.commit_lock.lock();

        let mut reservation = commit.reservation;
        if reservation.id != 0 && !self.reservations.contains_key(&reservation.id) {
            return Err(StoreError::NotFound(format!("reservation {}", reservation.id)));
        }

        // Credits before the debit so no intermediate balance dips below zero
        let mut changes: Vec<BalanceChange> = Vec::new();
        if let Some(previous) = commit.previous_customer_credit
            && previous.amount > 0.0
        {
            changes.push((
                previous.customer_id,
                to_decimal(previous.amount),
                LedgerReason::ReservationAdjustment,
            ));
        }
        let debit = to_decimal(commit.credit_debit);
        let release = to_decimal(commit.credit_release);
        if debit > Decimal::ZERO || release > Decimal::ZERO {
            let customer_id = reservation.customer_id.ok_or_else(|| {
                StoreError::Conflict("credit movement without a customer".into())
            })?;
            if release > Decimal::ZERO {
                changes.push((customer_id, release, LedgerReason::ReservationAdjustment));
            }
            if debit > Decimal::ZERO {
                changes.push((customer_id, -debit, LedgerReason::ReservationPayment));
            }
        }
        self.check_balance_changes(&changes)?;

        if reservation.id == 0 {
            reservation.id = self.last_reservation_id.fetch_add(1, Ordering::SeqCst) + 1;
            reservation.created_at = now_millis();
        }
        for (customer_id, amount, reason) in changes {
            self.apply_balance_change(customer_id, amount, reason, Some(reservation.id))?;
        }

        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn insert_override(&self, record: OccurrenceOverride) -> StoreResult<()> {
        self.overrides.entry(record.key()).or_insert(record);
        Ok(())
    }

    async fn cancel_reservation(&self, id: i64, refund: f64) -> StoreResult<f64> {
        let _guard = self.commit_lock.lock();

        let (status, customer_id) = self
            .reservations
            .get(&id)
            .map(|r| (r.status, r.customer_id))
            .ok_or_else(|| StoreError::NotFound(format!("reservation {}", id)))?;
        if status == ReservationStatus::Cancelled {
            return Ok(0.0);
        }

        let refund = to_decimal(refund);
        let refunded = match customer_id {
            Some(customer_id) if refund > Decimal::ZERO => {
                self.apply_balance_change(
                    customer_id,
                    refund,
                    LedgerReason::CancellationRefund,
                    Some(id),
                )?;
                to_f64(refund)
            }
            _ => 0.0,
        };

        if let Some(mut reservation) = self.reservations.get_mut(&id) {
            reservation.status = ReservationStatus::Cancelled;
        }
        Ok(refunded)
    }

    async fn adjust_credit(
        &self,
        customer_id: i64,
        amount: f64,
        reason: LedgerReason,
        reservation_id: Option<i64>,
    ) -> StoreResult<f64> {
        let _guard = self.commit_lock.lock();
        self.apply_balance_change(customer_id, to_decimal(amount), reason, reservation_id)
    }
}
