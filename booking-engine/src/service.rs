//! Booking Service
//!
//! Connects the pure engine to a [`BookingStore`]: loads venue snapshots,
//! quotes and saves drafts, routes occurrence edits and cancellations to
//! their Master Record, and builds the agenda and monthly reports.

use crate::analytics::{
    DailyOccupancy, RevenueSummary, monthly_occupancy, occupancy_calendar, revenue_summary,
};
use crate::core::EngineConfig;
use crate::inventory::{StockMap, StockQuery, available_stock, validate_selection};
use crate::money::to_f64;
use crate::pricing::{PricingCatalog, PricingInput, PricingResult, cancellation_refund, compute_pricing};
use crate::schedule::{DateWindow, candidate_dates, expand, series_dates};
use crate::store::{BookingStore, CreditReturn, ReservationCommit};
use crate::utils::time::TimeSpan;
use crate::utils::{EngineError, EngineResult, Entity};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::{
    Court, Customer, LedgerReason, Occurrence, OccurrenceOverride, OverrideKind, PaymentStatus,
    RentalItem, RentalSelection, Reservation, ReservationDraft,
};
use shared::util::{now_millis, snowflake_id};
use std::collections::HashSet;
use std::sync::Arc;

/// Venue data fetched once per editing session
#[derive(Debug, Clone)]
pub struct VenueSnapshot {
    pub venue_id: i64,
    /// `None` when rules or discounts could not be fetched
    pub catalog: Option<PricingCatalog>,
    pub rental_items: Vec<RentalItem>,
    pub courts: Vec<Court>,
}

impl VenueSnapshot {
    pub fn court(&self, id: i64) -> Option<&Court> {
        self.courts.iter().find(|c| c.id == id)
    }

    /// Pricing data missing, quotes will come back unpriced
    pub fn is_stale(&self) -> bool {
        self.catalog.is_none()
    }
}

/// Stored reservation with the pricing it was saved with
#[derive(Debug, Clone)]
pub struct SavedReservation {
    pub reservation: Reservation,
    pub pricing: PricingResult,
}

/// Result of a cancellation
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    /// Set when a single date of a series was cancelled
    pub override_record: Option<OccurrenceOverride>,
    /// Credit returned to the customer
    pub refunded: f64,
}

/// Occupancy and revenue of a month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthReport {
    pub window: DateWindow,
    pub occupancy_rate: f64,
    pub calendar: Vec<(NaiveDate, DailyOccupancy)>,
    pub revenue: RevenueSummary,
}

pub struct BookingService<S: BookingStore> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S: BookingStore> BookingService<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ==================== Snapshots ====================

    /// Fetch pricing data, rental items and courts of a venue
    ///
    /// A failed rule or discount fetch yields a snapshot without catalog
    /// instead of an error, so quotes are tagged unpriced rather than free.
    pub async fn load_snapshot(&self, venue_id: i64) -> EngineResult<VenueSnapshot> {
        let (rules, discounts, items, courts) = futures::join!(
            self.store.fetch_pricing_rules(venue_id),
            self.store.fetch_duration_discounts(venue_id),
            self.store.fetch_rental_items(venue_id),
            self.store.fetch_courts(venue_id),
        );

        let catalog = match (rules, discounts) {
            (Ok(rules), Ok(discounts)) => Some(PricingCatalog { rules, discounts }),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(venue_id, error = %e, "Pricing data unavailable");
                None
            }
        };

        Ok(VenueSnapshot {
            venue_id,
            catalog,
            rental_items: items?,
            courts: courts?,
        })
    }

    async fn occurrences_in(
        &self,
        venue_id: i64,
        courts: &[Court],
        window: DateWindow,
    ) -> EngineResult<Vec<Occurrence>> {
        let (masters, overrides) = futures::try_join!(
            self.store.fetch_reservations(venue_id, window),
            self.store.fetch_overrides(venue_id, window),
        )?;
        Ok(expand(&masters, &window, courts, &overrides))
    }

    // ==================== Quoting ====================

    /// Remaining rental stock for the draft's interval
    ///
    /// The draft's own series is excluded so editing never competes with itself.
    pub async fn stock_for(
        &self,
        snapshot: &VenueSnapshot,
        draft: &ReservationDraft,
    ) -> EngineResult<StockMap> {
        let window = DateWindow::single_day(draft.date).with_previous_day();
        let occurrences = self
            .occurrences_in(snapshot.venue_id, &snapshot.courts, window)
            .await?;
        available_stock(
            &snapshot.rental_items,
            &occurrences,
            &StockQuery {
                date: draft.date,
                start: draft.start_time,
                end: draft.end_time,
                exclude_series_id: draft.id,
            },
        )
    }

    /// Price a draft against a snapshot
    pub fn quote(
        &self,
        snapshot: &VenueSnapshot,
        draft: &ReservationDraft,
        customer: Option<&Customer>,
        already_applied: f64,
    ) -> EngineResult<PricingResult> {
        compute_pricing(&PricingInput {
            court_id: draft.court_id,
            sport: &draft.sport,
            date: draft.date,
            start: draft.start_time,
            end: draft.end_time,
            customer,
            catalog: snapshot.catalog.as_ref(),
            rental_items: &snapshot.rental_items,
            selection: &draft.rented_items,
            use_credit: draft.use_credit,
            already_applied,
            segment_minutes: self.config.segment_minutes,
        })
    }

    async fn customer_for(&self, draft: &ReservationDraft) -> EngineResult<Option<Customer>> {
        match draft.customer_id {
            Some(id) => self
                .store
                .fetch_customer(id)
                .await?
                .map(Some)
                .ok_or(EngineError::not_found(Entity::Customer, id)),
            None => Ok(None),
        }
    }

    async fn existing_for(&self, draft: &ReservationDraft) -> EngineResult<Option<Reservation>> {
        match draft.id {
            Some(id) => self
                .store
                .fetch_reservation(id)
                .await?
                .map(Some)
                .ok_or(EngineError::not_found(Entity::Reservation, id)),
            None => Ok(None),
        }
    }

    /// Quote a draft the way [`save`](Self::save) would, without persisting
    pub async fn preview(
        &self,
        snapshot: &VenueSnapshot,
        draft: &ReservationDraft,
    ) -> EngineResult<PricingResult> {
        TimeSpan::on_date(draft.date, draft.start_time, draft.end_time)?;
        let (customer, existing) =
            futures::try_join!(self.customer_for(draft), self.existing_for(draft))?;
        let already_applied = carried_credit(existing.as_ref(), draft);
        self.quote(snapshot, draft, customer.as_ref(), already_applied)
    }

    /// Validate the rental selection on every date the draft holds it
    ///
    /// A recurring draft is checked on each cadence date up to its end date,
    /// or up to the configured horizon when open-ended. Dates of the draft's
    /// own series cancelled by override hold nothing.
    async fn check_series_stock(
        &self,
        snapshot: &VenueSnapshot,
        draft: &ReservationDraft,
    ) -> EngineResult<RentalSelection> {
        if draft.rented_items.iter().all(|i| i.quantity == 0) {
            return Ok(RentalSelection::NoItems);
        }
        let Some(recurrence) = &draft.recurrence else {
            let stock = self.stock_for(snapshot, draft).await?;
            return validate_selection(&stock, &draft.rented_items);
        };

        let horizon_end = recurrence.end_date.unwrap_or_else(|| {
            draft.date + Duration::days(i64::from(self.config.recurrence_horizon_days))
        });
        let horizon = DateWindow::new(draft.date, horizon_end.max(draft.date))?;
        let dates = series_dates(draft.date, Some(recurrence), &horizon);

        let window = horizon.with_previous_day();
        let (masters, overrides) = futures::try_join!(
            self.store.fetch_reservations(snapshot.venue_id, window),
            self.store.fetch_overrides(snapshot.venue_id, window),
        )?;
        let occurrences = expand(&masters, &window, &snapshot.courts, &overrides);
        let cancelled: HashSet<NaiveDate> = overrides
            .iter()
            .filter(|o| draft.id == Some(o.series_id))
            .map(|o| o.date)
            .collect();

        let mut selection = None;
        for date in dates.into_iter().filter(|d| !cancelled.contains(d)) {
            let stock = available_stock(
                &snapshot.rental_items,
                &occurrences,
                &StockQuery {
                    date,
                    start: draft.start_time,
                    end: draft.end_time,
                    exclude_series_id: draft.id,
                },
            )?;
            let checked = validate_selection(&stock, &draft.rented_items).inspect_err(|_| {
                tracing::info!(date = %date, "Rental stock short on a series date");
            })?;
            selection.get_or_insert(checked);
        }

        match selection {
            Some(selection) => Ok(selection),
            None => {
                let stock = self.stock_for(snapshot, draft).await?;
                validate_selection(&stock, &draft.rented_items)
            }
        }
    }

    // ==================== Saving ====================

    /// Validate, price and persist a draft
    ///
    /// Credit already consumed by an earlier save is carried over and never
    /// debited again; only the newly applied amount reaches the ledger. When
    /// the edit moves the record to another customer, the previous customer
    /// gets their credit back in the same commit.
    pub async fn save(&self, draft: &ReservationDraft) -> EngineResult<SavedReservation> {
        TimeSpan::on_date(draft.date, draft.start_time, draft.end_time)?;

        let snapshot = self.load_snapshot(draft.venue_id).await?;
        if snapshot.court(draft.court_id).is_none() {
            return Err(EngineError::not_found(Entity::Court, draft.court_id));
        }

        let (customer, existing) =
            futures::try_join!(self.customer_for(draft), self.existing_for(draft))?;

        let selection = self.check_series_stock(&snapshot, draft).await?;

        let already_applied = carried_credit(existing.as_ref(), draft);
        let pricing = self.quote(&snapshot, draft, customer.as_ref(), already_applied)?;

        let reservation = Reservation {
            id: draft.id.unwrap_or(0),
            venue_id: draft.venue_id,
            court_id: draft.court_id,
            customer_id: draft.customer_id,
            customer_name: draft
                .customer_name
                .clone()
                .or_else(|| customer.as_ref().map(|c| c.name.clone())),
            customer_phone: draft
                .customer_phone
                .clone()
                .or_else(|| customer.as_ref().and_then(|c| c.phone.clone())),
            sport: draft.sport.clone(),
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: draft.status,
            kind: draft.kind,
            recurrence: draft.recurrence.clone(),
            total_price: pricing.final_payable,
            payment_status: existing
                .as_ref()
                .and_then(|r| r.payment_status)
                .or(Some(PaymentStatus::Pending)),
            credit_used: pricing.credit_total_applied,
            rented_items: selection,
            notes: draft.notes.clone(),
            created_at: existing.as_ref().map_or(0, |r| r.created_at),
        };

        let saved = self
            .store
            .commit_reservation(ReservationCommit {
                reservation,
                credit_debit: pricing.credit_newly_applied,
                credit_release: pricing.credit_to_release,
                previous_customer_credit: previous_customer_credit(existing.as_ref(), draft),
            })
            .await?;

        tracing::info!(
            reservation_id = saved.id,
            court_id = saved.court_id,
            date = %saved.date,
            final_payable = pricing.final_payable,
            credit_newly_applied = pricing.credit_newly_applied,
            status = ?pricing.status,
            "Reservation saved"
        );

        Ok(SavedReservation {
            reservation: saved,
            pricing,
        })
    }

    // ==================== Edit routing ====================

    /// Master Record an occurrence belongs to
    pub async fn master_for(&self, occurrence: &Occurrence) -> EngineResult<Reservation> {
        self.store
            .fetch_reservation(occurrence.master_id)
            .await?
            .ok_or(EngineError::not_found(Entity::Reservation, occurrence.master_id))
    }

    /// Draft for editing an occurrence, which edits its whole series
    pub async fn edit_occurrence(&self, occurrence: &Occurrence) -> EngineResult<ReservationDraft> {
        let master = self.master_for(occurrence).await?;
        Ok(ReservationDraft::from_reservation(&master))
    }

    /// Cancel one date of a series
    ///
    /// Non-recurring reservations are cancelled as a whole.
    pub async fn cancel_occurrence(
        &self,
        series_id: i64,
        date: NaiveDate,
    ) -> EngineResult<CancelOutcome> {
        let master = self
            .store
            .fetch_reservation(series_id)
            .await?
            .ok_or(EngineError::not_found(Entity::Reservation, series_id))?;

        if !master.is_recurring() {
            return self.cancel_series(series_id).await;
        }
        if candidate_dates(&master, &DateWindow::single_day(date)).is_empty() {
            return Err(EngineError::InvalidDate(format!(
                "{} is not a date of series {}",
                date, series_id
            )));
        }

        let record = OccurrenceOverride {
            id: snowflake_id(),
            series_id,
            date,
            kind: OverrideKind::Cancelled,
            created_at: now_millis(),
        };
        self.store.insert_override(record.clone()).await?;
        tracing::info!(series_id, date = %date, "Occurrence cancelled");

        Ok(CancelOutcome {
            override_record: Some(record),
            refunded: 0.0,
        })
    }

    /// Cancel a reservation (or whole series) and refund its credit
    pub async fn cancel_series(&self, series_id: i64) -> EngineResult<CancelOutcome> {
        let master = self
            .store
            .fetch_reservation(series_id)
            .await?
            .ok_or(EngineError::not_found(Entity::Reservation, series_id))?;

        if master.is_cancelled() {
            return Ok(CancelOutcome {
                override_record: None,
                refunded: 0.0,
            });
        }

        let refund = cancellation_refund(&master);
        let refunded = self
            .store
            .cancel_reservation(series_id, to_f64(refund))
            .await?;
        tracing::info!(series_id, refunded, "Reservation cancelled");

        Ok(CancelOutcome {
            override_record: None,
            refunded,
        })
    }

    /// Add credit to a customer's balance outside any reservation
    pub async fn grant_credit(&self, customer_id: i64, amount: f64) -> EngineResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::InvalidAmount(amount));
        }
        let balance = self
            .store
            .adjust_credit(customer_id, amount, LedgerReason::ManualGrant, None)
            .await?;
        tracing::info!(customer_id, amount, balance, "Credit granted");
        Ok(balance)
    }

    // ==================== Reading ====================

    /// Occurrences of a window sorted by date, start time and court
    pub async fn agenda(
        &self,
        venue_id: i64,
        window: DateWindow,
        court_filter: Option<i64>,
    ) -> EngineResult<Vec<Occurrence>> {
        let courts = self.store.fetch_courts(venue_id).await?;
        let mut occurrences = self.occurrences_in(venue_id, &courts, window).await?;
        occurrences.retain(|o| court_filter.is_none_or(|id| id == o.court_id));
        occurrences.sort_by_key(|o| (o.date, o.start_time, o.court_id));
        Ok(occurrences)
    }

    /// Occupancy calendar and revenue of the month containing `month`
    pub async fn month_report(
        &self,
        venue_id: i64,
        month: NaiveDate,
        today: NaiveDate,
    ) -> EngineResult<MonthReport> {
        let window = DateWindow::month_of(month);
        let courts = self.store.fetch_courts(venue_id).await?;
        let occurrences = self.occurrences_in(venue_id, &courts, window).await?;
        let interval = self.config.default_booking_interval_minutes;

        Ok(MonthReport {
            window,
            occupancy_rate: monthly_occupancy(month, &occurrences, &courts),
            calendar: occupancy_calendar(month, &occurrences, &courts, None, interval),
            revenue: revenue_summary(&occurrences, &window, today),
        })
    }
}

/// Credit of the stored record that stays with the draft's customer
fn carried_credit(existing: Option<&Reservation>, draft: &ReservationDraft) -> f64 {
    existing
        .filter(|r| r.customer_id == draft.customer_id)
        .map_or(0.0, |r| r.credit_used)
}

/// Credit owed back to the customer an edit moves the record away from
fn previous_customer_credit(
    existing: Option<&Reservation>,
    draft: &ReservationDraft,
) -> Option<CreditReturn> {
    let existing = existing?;
    if existing.customer_id == draft.customer_id || existing.credit_used <= 0.0 {
        return None;
    }
    Some(CreditReturn {
        customer_id: existing.customer_id?,
        amount: existing.credit_used,
    })
}
