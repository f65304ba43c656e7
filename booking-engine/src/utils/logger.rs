//! Logging Infrastructure
//!
//! Structured logging setup for hosts embedding the engine.
//! Features:
//! - Console output, pretty in development and JSON in production
//! - Daily rotating application logs (removed by [`cleanup_old_logs`])
//! - Permanent credit ledger log for events with target `"ledger"`
//!
//! The engine never installs a subscriber by itself.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, prelude::*};

/// Target used for credit ledger events
pub const LEDGER_TARGET: &str = "ledger";

/// Default retention for application log files
pub const DEFAULT_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the logger with console output only
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None)
}

/// Initialize the logging system with optional daily rotating files
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"), `RUST_LOG` takes precedence
/// * `json_format` - JSON output (production) instead of pretty output
/// * `log_dir` - Optional directory for file logging
///
/// # Examples
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// booking_engine::init_logger_with_file("info", true, Some("./logs"))?;
/// # Ok(())
/// # }
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };
    layers.push(console_layer);

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let ledger_log_dir = log_dir.join("ledger");
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&ledger_log_dir)?;

        // Application logs, rotated daily and subject to cleanup
        let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
        layers.push(file_layer(app_log, json_format, |target| target != LEDGER_TARGET));

        // Credit movements, never cleaned up
        let ledger_log = RollingFileAppender::new(Rotation::DAILY, ledger_log_dir, "ledger");
        layers.push(file_layer(ledger_log, json_format, |target| target == LEDGER_TARGET));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

fn file_layer(
    appender: RollingFileAppender,
    json_format: bool,
    accept: fn(&str) -> bool,
) -> BoxedLayer {
    let filter = tracing_subscriber::filter::filter_fn(move |meta| accept(meta.target()));
    let writer = std::sync::Mutex::new(appender);
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter)
            .boxed()
    }
}

/// Remove application log files older than `retention_days`
///
/// Only `app/app.YYYY-MM-DD` files are considered; ledger logs are kept.
/// Returns the number of deleted files.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(retention_days);

    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date_part) = name.strip_prefix("app.")
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}
