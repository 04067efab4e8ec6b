//! External system adapters
//!
//! - [`database`]: store seams used by the pipeline
//! - [`postgresql`]: the read-only metadata store session
//! - [`remote`]: ssh/rsync access to the remote host
//! - [`webhook`]: run outcome notification

pub mod database;
pub mod postgresql;
pub mod remote;
pub mod webhook;
