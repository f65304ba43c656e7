//! Recurrence Expansion
//!
//! Expands Master Records into the occurrences falling inside a date window.
//! Recurring masters yield one virtual occurrence per cadence date until
//! their end date; per-date overrides remove single dates without touching
//! the master.

use crate::utils::time::weekday_index;
use crate::utils::{EngineError, EngineResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::{
    Cadence, Court, Occurrence, OccurrenceEntry, OccurrenceKey, OccurrenceOverride, Recurrence,
    Reservation,
};
use std::collections::{HashMap, HashSet};

/// Inclusive date window `[from, to]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> EngineResult<Self> {
        if to < from {
            return Err(EngineError::InvalidWindow { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    /// Whole calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        let from = date.with_day(1).unwrap_or(date);
        let to = from
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { from, to }
    }

    /// The window grown by one day before, for bookings crossing midnight
    pub fn with_previous_day(&self) -> Self {
        Self {
            from: self.from.pred_opt().unwrap_or(self.from),
            to: self.to,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d <= self.to)
    }
}

/// Dates of a master that fall inside the window
pub fn candidate_dates(master: &Reservation, window: &DateWindow) -> Vec<NaiveDate> {
    series_dates(master.date, master.recurrence.as_ref(), window)
}

/// Dates inside the window of a series starting on `first`
///
/// Without recurrence the series is the single date `first`.
pub fn series_dates(
    first: NaiveDate,
    recurrence: Option<&Recurrence>,
    window: &DateWindow,
) -> Vec<NaiveDate> {
    let Some(recurrence) = recurrence else {
        return if window.contains(first) {
            vec![first]
        } else {
            Vec::new()
        };
    };

    let from = first.max(window.from);
    let last = recurrence
        .end_date
        .map_or(window.to, |end| end.min(window.to));
    if last < from {
        return Vec::new();
    }

    let anchor_weekday = weekday_index(first);
    let span = DateWindow { from, to: last };
    span.days()
        .filter(|d| match recurrence.cadence {
            Cadence::Daily => true,
            Cadence::Weekly => weekday_index(*d) == anchor_weekday,
        })
        .collect()
}

/// Occurrence of a master on one date
pub fn occurrence_from(master: &Reservation, date: NaiveDate) -> Occurrence {
    Occurrence {
        master_id: master.id,
        is_virtual: master.is_recurring(),
        venue_id: master.venue_id,
        court_id: master.court_id,
        date,
        start_time: master.start_time,
        end_time: master.end_time,
        status: master.status,
        kind: master.kind,
        customer_id: master.customer_id,
        customer_name: master.customer_name.clone(),
        sport: master.sport.clone(),
        total_price: master.total_price,
        payment_status: master.payment_status,
        credit_used: master.credit_used,
        rented_items: master.rented_items.clone(),
    }
}

/// Expand masters into scheduled and override-cancelled entries
///
/// Masters on courts missing from `courts` are skipped. Output order follows
/// the input order, dates ascending per master.
pub fn expand_entries(
    masters: &[Reservation],
    window: &DateWindow,
    courts: &[Court],
    overrides: &[OccurrenceOverride],
) -> Vec<OccurrenceEntry> {
    let court_ids: HashSet<i64> = courts.iter().map(|c| c.id).collect();
    let overrides: HashMap<OccurrenceKey, &OccurrenceOverride> =
        overrides.iter().map(|o| (o.key(), o)).collect();

    let mut entries = Vec::new();
    for master in masters {
        if !court_ids.contains(&master.court_id) {
            tracing::warn!(
                master_id = master.id,
                court_id = master.court_id,
                "Skipping reservation on unknown court"
            );
            continue;
        }

        for date in candidate_dates(master, window) {
            let key = OccurrenceKey {
                series_id: master.id,
                date,
            };
            match overrides.get(&key) {
                Some(cancelled) => {
                    tracing::debug!(master_id = master.id, date = %date, "Occurrence cancelled by override");
                    entries.push(OccurrenceEntry::CancelledOverride((*cancelled).clone()));
                }
                None => entries.push(OccurrenceEntry::Scheduled(occurrence_from(master, date))),
            }
        }
    }
    entries
}

/// Expand masters into the scheduled occurrences of the window
pub fn expand(
    masters: &[Reservation],
    window: &DateWindow,
    courts: &[Court],
    overrides: &[OccurrenceOverride],
) -> Vec<Occurrence> {
    expand_entries(masters, window, courts, overrides)
        .into_iter()
        .filter_map(OccurrenceEntry::scheduled)
        .collect()
}
