//! Time utilities
//!
//! Calendar dates are local `NaiveDate`s and clock times are [`ClockTime`]s.
//! A clock interval whose end is at or before its start runs into the next
//! calendar day; [`TimeSpan`] anchors such intervals to absolute local
//! date-times so duration and overlap arithmetic never has to special-case
//! midnight again.

use super::{EngineError, EngineResult};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use shared::types::{ClockTime, MINUTES_PER_DAY};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::InvalidDate(date.to_string()))
}

/// Parse a clock string (HH:MM)
pub fn parse_clock(clock: &str) -> EngineResult<ClockTime> {
    Ok(clock.parse::<ClockTime>()?)
}

/// Day of week index (0=Sunday..6=Saturday)
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// End of `[start, end)` in minutes after the start day's midnight
///
/// An end at or before the start is on the following day, so the result is
/// always greater than `start.minutes()` unless both are equal.
pub fn end_minutes(start: ClockTime, end: ClockTime) -> u32 {
    let end_min = end.minutes() as u32;
    if end <= start {
        end_min + MINUTES_PER_DAY as u32
    } else {
        end_min
    }
}

/// Duration of a clock interval in minutes, `None` for a zero-length interval
pub fn clock_duration_minutes(start: ClockTime, end: ClockTime) -> Option<u32> {
    if start == end {
        return None;
    }
    Some(end_minutes(start, end) - start.minutes() as u32)
}

/// Parse a comma-separated list of `HH:MM-HH:MM` ranges
///
/// Malformed entries are skipped with a warning.
pub fn parse_ranges(ranges: &str) -> Vec<(ClockTime, ClockTime)> {
    ranges
        .split(',')
        .filter(|r| !r.trim().is_empty())
        .filter_map(|range| {
            let parsed: Option<(ClockTime, ClockTime)> = range
                .trim()
                .split_once('-')
                .and_then(|(s, e)| Some((s.parse().ok()?, e.parse().ok()?)));
            if parsed.is_none() {
                tracing::warn!(range = %range.trim(), "Skipping malformed hours range");
            }
            parsed
        })
        .collect()
}

/// Absolute local interval `[start, end)` of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    /// Anchor a clock interval on a calendar date
    ///
    /// Equal start and end is rejected as [`EngineError::InvalidInterval`].
    pub fn on_date(date: NaiveDate, start: ClockTime, end: ClockTime) -> EngineResult<Self> {
        let minutes = clock_duration_minutes(start, end)
            .ok_or(EngineError::InvalidInterval { date, start, end })?;
        let start_at = date.and_time(chrono::NaiveTime::MIN)
            + Duration::minutes(start.minutes() as i64);
        Ok(Self {
            start: start_at,
            end: start_at + Duration::minutes(minutes as i64),
        })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Half-open overlap test
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end.date() > self.start.date()
            && self.end.time() != chrono::NaiveTime::MIN
    }
}
