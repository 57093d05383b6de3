//! Logging Infrastructure
//!
//! The console owns the terminal, so logs go to a daily rotating file
//! (`<log_dir>/orderdesk.YYYY-MM-DD.log`, kept for 14 days). Without a log
//! directory, logs go to stderr, which is only useful when the UI is not
//! running (e.g. `--help` or startup failures).

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_PREFIX: &str = "orderdesk";
const LOG_SUFFIX: &str = "log";
const RETENTION_DAYS: i64 = 14;

/// Delete rotated log files older than the retention window
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(RETENTION_DAYS);
    let mut removed = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Match orderdesk.YYYY-MM-DD.log
        if let Some(date_part) = name
            .strip_prefix(LOG_PREFIX)
            .and_then(|d| d.strip_prefix('.'))
            .and_then(|d| d.strip_suffix(LOG_SUFFIX))
            .and_then(|d| d.strip_suffix('.'))
            && let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }

    Ok(removed)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins if set
/// * `json_format` - Whether to write JSON lines
/// * `log_dir` - Directory for the rotating log file; `None` logs to stderr
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let Some(dir) = log_dir else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed();
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    fs::create_dir_all(dir)?;

    let file_log = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .build(dir)?;

    let file_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(file_log))
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::sync::Mutex::new(file_log))
            .boxed()
    };

    subscriber.with(file_layer).try_init()?;

    // After init so the deletions land in the new log
    match cleanup_old_logs(dir) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Old log files cleaned up"),
        Err(e) => tracing::warn!(error = %e, "Failed to clean up old logs"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_only_removes_expired_logs() {
        let dir = tempfile::tempdir().unwrap();
        let today = chrono::Local::now().date_naive();
        let old = today - chrono::Duration::days(30);

        let fresh = dir.path().join(format!("orderdesk.{}.log", today.format("%Y-%m-%d")));
        let stale = dir.path().join(format!("orderdesk.{}.log", old.format("%Y-%m-%d")));
        let unrelated = dir.path().join("notes.txt");
        for path in [&fresh, &stale, &unrelated] {
            fs::write(path, "x").unwrap();
        }

        assert_eq!(cleanup_old_logs(dir.path()).unwrap(), 1);
        assert!(fresh.exists());
        assert!(!stale.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("nope")).unwrap(), 0);
    }

    #[test]
    fn test_init_logs_cleanup_into_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let old = chrono::Local::now().date_naive() - chrono::Duration::days(30);
        let stale = dir.path().join(format!("orderdesk.{}.log", old.format("%Y-%m-%d")));
        fs::write(&stale, "x").unwrap();

        init_logger("info", false, Some(dir.path())).unwrap();
        assert!(!stale.exists());

        let written: String = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| fs::read_to_string(entry.unwrap().path()).unwrap())
            .collect();
        assert!(written.contains("Deleted old log file"));
        assert!(written.contains("Old log files cleaned up"));
    }
}
