//! Logging and observability
//!
//! This module provides structured logging with:
//! - A console subscriber for commands outside a sync run
//! - A per-run [`RunLog`] that writes a timestamped log file whose text is
//!   shipped with the run notification
//!
//! # Example
//!
//! ```no_run
//! use bisync::logging::RunLog;
//! use std::path::Path;
//! use tracing::instrument::WithSubscriber;
//!
//! # async fn example() -> bisync::domain::Result<()> {
//! let run_log = RunLog::create(Path::new("logs"), "bisync.log.now", "info", "text")?;
//! async {
//!     tracing::info!("inside the run");
//! }
//! .with_subscriber(run_log.dispatch())
//! .await;
//! let text = run_log.captured_text()?;
//! # Ok(())
//! # }
//! ```

pub mod run_log;
pub mod structured;

pub use run_log::RunLog;
pub use structured::init_logging;

/// Log an error with its kind and context
///
/// # Example
///
/// ```no_run
/// use bisync::log_error_with_context;
/// use bisync::domain::BisyncError;
///
/// let error = BisyncError::Transfer("rsync exited with 23".to_string());
/// log_error_with_context!(&error, "Sync run failed");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = $error.kind(),
            context = $context,
            "Error occurred"
        );
    };
}
