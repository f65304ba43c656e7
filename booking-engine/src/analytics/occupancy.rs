//! Occupancy Analytics
//!
//! Slot and hour based occupancy of courts plus a revenue summary.
//! Cancelled occurrences never count. Rates are percentages capped at 100.

use crate::money::{to_decimal, to_f64};
use crate::schedule::DateWindow;
use crate::utils::time::{clock_duration_minutes, parse_ranges, weekday_index};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Court, Occurrence};
use std::collections::BTreeMap;

/// Occupancy of one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyOccupancy {
    /// Booked slots over available slots, in percent
    pub rate: f64,
    pub booked: u32,
    pub total: u32,
}

/// Revenue over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub revenue: f64,
    pub revenue_by_court: BTreeMap<i64, f64>,
    pub bookings: usize,
    pub bookings_today: usize,
    /// Start hour with the most bookings, earliest on ties
    pub peak_start_hour: Option<u16>,
}

fn capped_rate(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    to_f64((part * Decimal::ONE_HUNDRED / whole).min(Decimal::ONE_HUNDRED))
}

/// Opening minutes of a court on a date, one entry per range
fn open_ranges_minutes(court: &Court, date: NaiveDate) -> Vec<u32> {
    let weekday = weekday_index(date);
    if !court.is_active() || !court.hours.is_open_on(weekday) {
        return Vec::new();
    }
    parse_ranges(court.hours.ranges_for(weekday))
        .into_iter()
        .filter_map(|(start, end)| clock_duration_minutes(start, end))
        .collect()
}

/// Number of bookable slots of a court on a date
///
/// Ranges running past midnight count up to their end on the next day.
pub fn available_slots_for_day(court: &Court, date: NaiveDate, default_interval: u32) -> u32 {
    let interval = court
        .booking_interval_minutes
        .filter(|m| *m > 0)
        .unwrap_or(default_interval)
        .max(1);
    open_ranges_minutes(court, date)
        .into_iter()
        .map(|minutes| minutes / interval)
        .sum()
}

/// Slot occupancy of a day over active courts, optionally one court only
pub fn daily_occupancy(
    date: NaiveDate,
    occurrences: &[Occurrence],
    courts: &[Court],
    court_filter: Option<i64>,
    default_interval: u32,
) -> DailyOccupancy {
    let relevant: Vec<&Court> = courts
        .iter()
        .filter(|c| c.is_active() && court_filter.is_none_or(|id| id == c.id))
        .collect();
    if relevant.is_empty() {
        return DailyOccupancy {
            rate: 0.0,
            booked: 0,
            total: 0,
        };
    }

    let total: u32 = relevant
        .iter()
        .map(|c| available_slots_for_day(c, date, default_interval))
        .sum();
    let booked = occurrences
        .iter()
        .filter(|o| {
            o.date == date && !o.is_cancelled() && court_filter.is_none_or(|id| id == o.court_id)
        })
        .count() as u32;

    DailyOccupancy {
        rate: capped_rate(Decimal::from(booked), Decimal::from(total)),
        booked,
        total,
    }
}

/// Daily occupancy for every day of the month containing `month`
pub fn occupancy_calendar(
    month: NaiveDate,
    occurrences: &[Occurrence],
    courts: &[Court],
    court_filter: Option<i64>,
    default_interval: u32,
) -> Vec<(NaiveDate, DailyOccupancy)> {
    let window = DateWindow::month_of(month);
    window
        .days()
        .map(|day| {
            let occupancy = daily_occupancy(day, occurrences, courts, court_filter, default_interval);
            (day, occupancy)
        })
        .collect()
}

/// Hour based occupancy of a month over all active courts
pub fn monthly_occupancy(month: NaiveDate, occurrences: &[Occurrence], courts: &[Court]) -> f64 {
    let window = DateWindow::month_of(month);

    let available_minutes: u32 = window
        .days()
        .flat_map(|day| courts.iter().flat_map(move |c| open_ranges_minutes(c, day)))
        .sum();

    let booked_minutes: u32 = occurrences
        .iter()
        .filter(|o| !o.is_cancelled() && window.contains(o.date))
        .filter_map(|o| clock_duration_minutes(o.start_time, o.end_time))
        .sum();

    capped_rate(Decimal::from(booked_minutes), Decimal::from(available_minutes))
}

/// Revenue and booking counts of the occurrences inside a window
pub fn revenue_summary(
    occurrences: &[Occurrence],
    window: &DateWindow,
    today: NaiveDate,
) -> RevenueSummary {
    let counted: Vec<&Occurrence> = occurrences
        .iter()
        .filter(|o| !o.is_cancelled() && window.contains(o.date))
        .collect();

    let mut revenue = Decimal::ZERO;
    let mut by_court: BTreeMap<i64, Decimal> = BTreeMap::new();
    let mut by_hour: BTreeMap<u16, usize> = BTreeMap::new();
    for o in &counted {
        let price = to_decimal(o.total_price);
        revenue += price;
        *by_court.entry(o.court_id).or_default() += price;
        *by_hour.entry(o.start_time.hour()).or_default() += 1;
    }

    // max_by_key keeps the last maximum, so walk hours in reverse
    let peak_start_hour = by_hour
        .iter()
        .rev()
        .max_by_key(|(_, count)| **count)
        .map(|(hour, _)| *hour);

    RevenueSummary {
        revenue: to_f64(revenue),
        revenue_by_court: by_court.into_iter().map(|(id, v)| (id, to_f64(v))).collect(),
        bookings: counted.len(),
        bookings_today: counted.iter().filter(|o| o.date == today).count(),
        peak_start_hour,
    }
}
