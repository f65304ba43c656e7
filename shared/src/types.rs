//! Common types for the shared crate
//!
//! Value types used across models and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Minutes in a calendar day
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when a clock string is not a valid `HH:MM`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid clock time '{0}', expected HH:MM")]
pub struct ClockParseError(pub String);

/// Wall-clock time of day with minute precision (`HH:MM`)
///
/// Stored as minutes since local midnight, always in `0..1440`.
/// Serialized as the `HH:MM` string the data store uses. Seconds suffixes
/// (`HH:MM:SS`) are accepted on input and truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// 00:00
    pub const MIDNIGHT: ClockTime = ClockTime(0);

    /// Build from hour and minute, `None` if out of range
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Build from minutes since midnight, `None` if `>= 1440`
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Minutes since midnight
    pub const fn minutes(&self) -> u16 {
        self.0
    }

    pub const fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(&self) -> u16 {
        self.0 % 60
    }

    pub const fn is_midnight(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(':');
        let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
            return Err(ClockParseError(s.to_string()));
        };
        // Optional seconds are tolerated but must still be numeric
        if let Some(sec) = parts.next()
            && (sec.len() != 2 || sec.parse::<u16>().is_err())
        {
            return Err(ClockParseError(s.to_string()));
        }
        if parts.next().is_some() || h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(ClockParseError(s.to_string()));
        }
        let hour: u16 = h.parse().map_err(|_| ClockParseError(s.to_string()))?;
        let minute: u16 = m.parse().map_err(|_| ClockParseError(s.to_string()))?;
        Self::from_hm(hour, minute).ok_or_else(|| ClockParseError(s.to_string()))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ClockParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}
