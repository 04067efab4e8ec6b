//! Remote transport abstraction

use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// Operations the sync client needs from the remote host
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Check that the host answers a trivial command
    ///
    /// # Errors
    ///
    /// Returns `RemoteUnreachable` if the host does not answer.
    async fn probe(&self) -> Result<()>;

    /// Whether `path` is an existing directory on the host
    async fn path_exists(&self, path: &str) -> Result<bool>;

    /// Create `path` and any missing parents
    async fn ensure_dir(&self, path: &str) -> Result<()>;

    /// Mirror the contents of `local_dir` into `remote_dir`
    ///
    /// With `delete_extraneous`, remote files absent locally are removed.
    /// Transfer output is appended to `transfer_log`.
    async fn mirror(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        delete_extraneous: bool,
        transfer_log: &Path,
    ) -> Result<()>;
}
