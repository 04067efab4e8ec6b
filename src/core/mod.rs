//! Core pipeline logic for bisync.
//!
//! # Modules
//!
//! - [`workspace`] - Local output, temporary and log directories
//! - [`export`] - Merge engine, artifacts and the run coordinator
//! - [`remote_sync`] - Mirroring the temporary directory to the remote host
//!
//! # Run Workflow
//!
//! 1. **Prepare**: Recreate an empty temporary directory
//! 2. **Catalog**: Load the report definitions visible to the organization
//! 3. **Merge**: Run base and customization queries, write CSV artifacts
//! 4. **Sync**: Probe the remote host, mirror, promote to the output directory
//! 5. **Notify**: Send the outcome and the run log to the webhook
//!
//! # Example
//!
//! ```rust,no_run
//! use bisync::config::{BisyncConfig, SyncParameters};
//! use bisync::core::export::SyncCoordinator;
//! use bisync::logging::RunLog;
//!
//! # async fn example(raw: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let params = SyncParameters::parse(raw)?;
//! let coordinator = SyncCoordinator::new(params, BisyncConfig::default())?;
//!
//! coordinator.workspace().ensure_log_dir()?;
//! let run_log = RunLog::create(coordinator.workspace().log_dir(), "bisync.log.now", "info", "text")?;
//!
//! let summary = coordinator.run(&run_log).await;
//! println!("Exported: {}", summary.exported_count());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod remote_sync;
pub mod workspace;
