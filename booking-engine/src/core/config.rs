/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden from the environment (a `.env` file is
/// loaded first when present):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | SEGMENT_MINUTES | 30 | Pricing segment length |
/// | DEFAULT_BOOKING_INTERVAL_MINUTES | 60 | Slot length for courts without one |
/// | RECURRENCE_HORIZON_DAYS | 180 | Days of an open-ended series checked for rental stock |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | (unset) | Directory for rotating log files |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// SEGMENT_MINUTES=15 LOG_LEVEL=debug cargo test
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of a pricing segment in minutes
    pub segment_minutes: u32,
    /// Booking slot length used for occupancy when a court has none
    pub default_booking_interval_minutes: u32,
    /// How far ahead an open-ended series is checked for rental stock
    pub recurrence_horizon_days: u32,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | staging | production
    pub environment: String,
}

pub const DEFAULT_SEGMENT_MINUTES: u32 = 30;
pub const DEFAULT_BOOKING_INTERVAL_MINUTES: u32 = 60;
pub const DEFAULT_RECURRENCE_HORIZON_DAYS: u32 = 180;

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self {
            segment_minutes: std::env::var("SEGMENT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m: &u32| *m > 0 && 60 % *m == 0)
                .unwrap_or(DEFAULT_SEGMENT_MINUTES),
            default_booking_interval_minutes: std::env::var("DEFAULT_BOOKING_INTERVAL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m: &u32| *m > 0)
                .unwrap_or(DEFAULT_BOOKING_INTERVAL_MINUTES),
            recurrence_horizon_days: std::env::var("RECURRENCE_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|d: &u32| *d > 0)
                .unwrap_or(DEFAULT_RECURRENCE_HORIZON_DAYS),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the segment length, mostly for tests
    pub fn with_segment_minutes(mut self, minutes: u32) -> Self {
        self.segment_minutes = minutes;
        self
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Install the logger described by this configuration
    pub fn init_logging(&self) -> anyhow::Result<()> {
        crate::utils::logger::init_logger_with_file(
            &self.log_level,
            self.log_json || self.is_production(),
            self.log_dir.as_deref(),
        )
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segment_minutes: DEFAULT_SEGMENT_MINUTES,
            default_booking_interval_minutes: DEFAULT_BOOKING_INTERVAL_MINUTES,
            recurrence_horizon_days: DEFAULT_RECURRENCE_HORIZON_DAYS,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            environment: "development".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.segment_minutes, 30);
        assert_eq!(config.default_booking_interval_minutes, 60);
        assert_eq!(config.recurrence_horizon_days, 180);
        assert!(config.is_development());
        assert!(!config.is_production());
    }

    #[test]
    fn test_segment_override() {
        let config = EngineConfig::default().with_segment_minutes(15);
        assert_eq!(config.segment_minutes, 15);
    }
}
