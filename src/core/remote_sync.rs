//! Remote sync client
//!
//! Ships the temporary workspace to the remote host and, once the mirror
//! succeeded, promotes it to the local output directory. Every step is fatal
//! and nothing is retried.

use crate::adapters::remote::RemoteTransport;
use crate::core::workspace::Workspace;
use crate::domain::{BisyncError, Result};
use chrono::Local;

/// Drives a [`RemoteTransport`] through the sync sequence
pub struct RemoteSyncClient<'a> {
    transport: &'a dyn RemoteTransport,
    base_path: String,
}

impl<'a> RemoteSyncClient<'a> {
    pub fn new(transport: &'a dyn RemoteTransport, base_path: impl Into<String>) -> Self {
        Self {
            transport,
            base_path: base_path.into(),
        }
    }

    /// Mirror the workspace's temporary directory and promote it
    ///
    /// Returns the number of files shipped.
    ///
    /// # Errors
    ///
    /// - `RemoteUnreachable` if the liveness probe fails
    /// - `RemoteMissingPath` if the remote base path does not exist
    /// - `Transfer` if the remote directory cannot be created or the mirror fails
    pub async fn sync(&self, workspace: &Workspace) -> Result<usize> {
        self.transport.probe().await?;
        tracing::debug!("Remote host is reachable");

        if !self.transport.path_exists(&self.base_path).await? {
            return Err(BisyncError::RemoteMissingPath(self.base_path.clone()));
        }

        let remote_dir = workspace.remote_subdir(&self.base_path);
        if !self.transport.path_exists(&remote_dir).await? {
            tracing::info!(path = %remote_dir, "Creating remote directory");
            self.transport.ensure_dir(&remote_dir).await?;
        }

        let file_count = workspace.artifact_count()?;
        if file_count == 0 {
            tracing::warn!("No artifacts to transfer, remote files are kept");
        }

        let transfer_log = workspace.transfer_log_path(Local::now().date_naive());
        self.transport
            .mirror(workspace.tmp_dir(), &remote_dir, file_count > 0, &transfer_log)
            .await?;

        workspace.promote()?;
        tracing::info!(files = file_count, remote = %remote_dir, "Artifacts synced");
        Ok(file_count)
    }
}
