//! Run summary and reporting

use crate::domain::BisyncError;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one report definition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Report name
    pub name: String,

    /// Artifact file names written to the temporary directory
    pub artifacts: Vec<String>,

    /// Rows in the prefixed base artifact
    pub rows: usize,

    /// Reason the report was skipped, if it was
    pub skipped: Option<String>,

    /// Merges left out for this report
    pub warnings: Vec<String>,
}

impl ReportOutcome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }
}

/// Final status of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed {
        /// Stable error label, see [`BisyncError::kind`]
        kind: &'static str,
        message: String,
    },
}

/// Summary of a sync run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reports: Vec<ReportOutcome>,
    pub status: RunStatus,
    /// Files mirrored to the remote host
    pub transferred_files: usize,
    pub duration: Duration,
    pub log_path: Option<PathBuf>,
    /// Whether the webhook accepted the notification
    pub notified: bool,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            status: RunStatus::Succeeded,
            transferred_files: 0,
            duration: Duration::from_secs(0),
            log_path: None,
            notified: false,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the error that ended the run
    pub fn fail(&mut self, error: &BisyncError) {
        self.status = RunStatus::Failed {
            kind: error.kind(),
            message: error.to_string(),
        };
    }

    pub fn is_successful(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn exported_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_skipped()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn artifact_count(&self) -> usize {
        self.reports.iter().map(|r| r.artifacts.len()).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            reports = self.reports.len(),
            exported = self.exported_count(),
            skipped = self.skipped_count(),
            artifacts = self.artifact_count(),
            transferred = self.transferred_files,
            duration_secs = self.duration.as_secs(),
            "Sync run finished"
        );

        for report in self.reports.iter().filter(|r| !r.warnings.is_empty()) {
            for warning in &report.warnings {
                tracing::warn!(report = %report.name, warning = %warning, "Report warning");
            }
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
