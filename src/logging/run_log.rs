//! Per-run logging context
//!
//! A [`RunLog`] is created once per sync run. It owns the run's tracing
//! dispatcher (console plus a timestamped log file) and reads the file back
//! when the run summary is sent to the webhook. The run future is bound to
//! the dispatcher with [`WithSubscriber`](tracing::instrument::WithSubscriber),
//! so nothing about the run lives in process-wide logging state.

use super::structured::{console_layer, env_filter, BoxedLayer};
use crate::domain::{BisyncError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Logging context for one run
pub struct RunLog {
    path: PathBuf,
    dispatch: Dispatch,
}

impl RunLog {
    /// Create the run log file and its dispatcher
    ///
    /// # Arguments
    ///
    /// * `log_dir` - Existing directory the file is created in
    /// * `file_name` - Name of the run log file
    /// * `log_level` - Log level (trace, debug, info, warn, error)
    /// * `format` - `text` or `json`
    pub fn create(log_dir: &Path, file_name: &str, log_level: &str, format: &str) -> Result<Self> {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(log_dir)
            .map_err(|e| {
                BisyncError::Io(format!(
                    "Failed to create run log in {}: {e}",
                    log_dir.display()
                ))
            })?;

        let file_layer: BoxedLayer = match format {
            "json" => tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(appender)
                .with_filter(env_filter(log_level)?)
                .boxed(),
            _ => tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(appender)
                .with_filter(env_filter(log_level)?)
                .boxed(),
        };

        let layers = vec![console_layer(env_filter(log_level)?), file_layer];
        let dispatch = Dispatch::new(tracing_subscriber::registry().with(layers));

        Ok(Self {
            path: log_dir.join(file_name),
            dispatch,
        })
    }

    /// Path of the run log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Dispatcher every event of the run goes through
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch.clone()
    }

    /// Full text of the run log: every line trimmed and newline-terminated
    pub fn captured_text(&self) -> Result<String> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to read run log {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(raw.lines().map(|line| format!("{}\n", line.trim())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_log_captures_events() {
        let dir = TempDir::new().unwrap();
        let log = RunLog::create(dir.path(), "bisync.log.test", "debug", "text").unwrap();

        tracing::dispatcher::with_default(&log.dispatch(), || {
            tracing::info!(report = "sales", "executing base query");
            tracing::debug!("closing database connections");
        });

        let text = log.captured_text().unwrap();
        assert!(text.contains("executing base query"));
        assert!(text.contains("report=\"sales\""));
        assert!(text.contains("closing database connections"));
        assert!(text.ends_with('\n'));
        assert_eq!(log.path(), dir.path().join("bisync.log.test"));
    }

    #[test]
    fn test_run_log_respects_level() {
        let dir = TempDir::new().unwrap();
        let log = RunLog::create(dir.path(), "bisync.log.level", "warn", "text").unwrap();

        tracing::dispatcher::with_default(&log.dispatch(), || {
            tracing::info!("not recorded");
            tracing::warn!("recorded");
        });

        let text = log.captured_text().unwrap();
        assert!(!text.contains("not recorded"));
        assert!(text.contains("recorded"));
    }
}
