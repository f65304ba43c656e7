//! Court Model

use serde::{Deserialize, Serialize};

/// Court operational status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourtStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Weekly opening hours of a court
///
/// Ranges are `"HH:MM-HH:MM"` lists separated by commas,
/// e.g. `"08:00-12:00, 14:00-22:00"`. An end at or before the start runs
/// past midnight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperatingHours {
    /// Open days of week (0=Sunday..6=Saturday)
    pub open_days: Vec<u8>,
    /// Ranges used Monday to Friday
    pub weekday_hours: String,
    /// Ranges used Saturday and Sunday
    pub weekend_hours: String,
}

impl OperatingHours {
    /// Same hours every day of the week
    pub fn every_day(hours: impl Into<String>) -> Self {
        let hours = hours.into();
        Self {
            open_days: (0..7).collect(),
            weekday_hours: hours.clone(),
            weekend_hours: hours,
        }
    }

    /// Whether the court opens on the given weekday (0=Sunday..6=Saturday)
    pub fn is_open_on(&self, weekday: u8) -> bool {
        self.open_days.contains(&weekday)
    }

    /// Range list for a weekday (0=Sunday..6=Saturday)
    pub fn ranges_for(&self, weekday: u8) -> &str {
        if weekday == 0 || weekday == 6 {
            &self.weekend_hours
        } else {
            &self.weekday_hours
        }
    }
}

/// Court entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    /// Main sport played on this court (informational)
    pub sport: String,
    pub status: CourtStatus,
    pub hours: OperatingHours,
    /// Slot length used for occupancy counting, venue default when absent
    pub booking_interval_minutes: Option<u32>,
    pub created_at: i64,
}

impl Court {
    pub fn is_active(&self) -> bool {
        self.status == CourtStatus::Active
    }
}
