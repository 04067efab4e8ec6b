//! Local workspace layout for one client/organization pair
//!
//! ```text
//! <root>/<client>/<org>_output/   artifacts of the last successful run
//! <root>/<client>/<org>_tmp/      artifacts of the current run
//! <root>/<client>/<org>_logs/     run logs and daily transfer logs
//! ```

use crate::domain::{BisyncError, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Prefix of every run log file name
pub const RUN_LOG_PREFIX: &str = "bisync.log";

/// Filesystem paths of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    client: String,
    org: String,
    output_dir: PathBuf,
    tmp_dir: PathBuf,
    log_dir: PathBuf,
}

/// Make a display name usable as a path component
pub fn sanitize(name: &str) -> String {
    name.replace(' ', "_").replace('&', "+")
}

impl Workspace {
    /// Derive the layout for `client_name`/`org_name` under `root`
    pub fn new(root: impl AsRef<Path>, client_name: &str, org_name: &str) -> Self {
        let client = sanitize(client_name);
        let org = sanitize(org_name);
        let client_dir = root.as_ref().join(&client);

        Self {
            output_dir: client_dir.join(format!("{org}_output")),
            tmp_dir: client_dir.join(format!("{org}_tmp")),
            log_dir: client_dir.join(format!("{org}_logs")),
            client,
            org,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Create the log directory; runs before logging is initialized
    pub fn ensure_log_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.log_dir).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to create log directory {}: {e}",
                self.log_dir.display()
            ))
        })
    }

    /// Create the output directory if absent and start from an empty
    /// temporary directory
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        self.discard()?;
        fs::create_dir_all(&self.tmp_dir).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to create temporary directory {}: {e}",
                self.tmp_dir.display()
            ))
        })?;

        tracing::debug!(tmp = %self.tmp_dir.display(), "Workspace prepared");
        Ok(())
    }

    /// File name of the run log started at `now`
    ///
    /// Millisecond precision keeps runs started within the same second from
    /// appending to one file.
    pub fn run_log_file_name(now: DateTime<Local>) -> String {
        format!("{RUN_LOG_PREFIX}.{}", now.format("%Y-%m-%d_%H-%M-%S%.3f"))
    }

    pub fn run_log_path(&self, now: DateTime<Local>) -> PathBuf {
        self.log_dir.join(Self::run_log_file_name(now))
    }

    /// Daily transfer log, appended to by every run of the day
    pub fn transfer_log_path(&self, today: NaiveDate) -> PathBuf {
        self.log_dir
            .join(format!("rsync_{}.log", today.format("%Y-%m-%d")))
    }

    /// Number of entries in the temporary directory
    pub fn artifact_count(&self) -> Result<usize> {
        let entries = fs::read_dir(&self.tmp_dir).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to list {}: {e}",
                self.tmp_dir.display()
            ))
        })?;
        Ok(entries.count())
    }

    /// Remote directory the artifacts are mirrored into
    pub fn remote_subdir(&self, base_path: &str) -> String {
        format!("{base_path}{}/{}", self.client, self.org)
    }

    /// Replace the output directory with the temporary one
    pub fn promote(&self) -> Result<()> {
        match fs::remove_dir_all(&self.output_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(BisyncError::Io(format!(
                    "Failed to remove {}: {e}",
                    self.output_dir.display()
                )))
            }
        }

        fs::rename(&self.tmp_dir, &self.output_dir).map_err(|e| {
            BisyncError::Io(format!(
                "Failed to move {} to {}: {e}",
                self.tmp_dir.display(),
                self.output_dir.display()
            ))
        })?;

        tracing::info!(output = %self.output_dir.display(), "Output directory updated");
        Ok(())
    }

    /// Remove the temporary directory; a missing directory is fine
    pub fn discard(&self) -> Result<()> {
        match fs::remove_dir_all(&self.tmp_dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BisyncError::Io(format!(
                "Failed to remove {}: {e}",
                self.tmp_dir.display()
            ))),
        }
    }
}
