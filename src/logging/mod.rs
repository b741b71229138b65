//! Diagnostic logging to disk.
//!
//! The terminal belongs to the UI, so `tracing` output goes to a daily log
//! file named `meridian_<date>.log` in the configured log directory
//! (default: `~/.local/share/meridian/logs/`). `RUST_LOG` overrides the
//! configured level.

use crate::config::{expand_home, LoggingConfig};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn log_file_name(date: NaiveDate) -> String {
    format!("meridian_{}.log", date.format("%Y-%m-%d"))
}

pub fn log_file_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(log_file_name(date))
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("meridian={}", level)))
        .unwrap_or_else(|_| EnvFilter::new("meridian=info"))
}

/// Install the global subscriber. Returns the log file in use, or `None`
/// when logging is disabled.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !config.enabled {
        return Ok(None);
    }

    let log_dir = expand_home(&config.log_dir);
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = log_file_path(&log_dir, chrono::Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter_for(&config.level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(log_file_name(date), "meridian_2024-03-09.log");
        assert_eq!(
            log_file_path(Path::new("/tmp/logs"), date),
            PathBuf::from("/tmp/logs/meridian_2024-03-09.log")
        );
    }

    #[test]
    fn test_disabled_logging_installs_nothing() {
        let config = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(init(&config).unwrap().is_none());
    }
}
