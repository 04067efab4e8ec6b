//! Remote host access
//!
//! [`RemoteTransport`] is the seam the sync client uses; [`SshTransport`]
//! implements it with the system `ssh` and `rsync` programs.

pub mod ssh;
pub mod traits;

pub use ssh::SshTransport;
pub use traits::RemoteTransport;
