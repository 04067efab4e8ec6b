// bisync - BI report export and remote sync
// Copyright (c) 2025 Bisync Contributors
// Licensed under the MIT License

//! # bisync - BI report export and remote sync
//!
//! bisync exports the report catalog of an ERP tenant to CSV files and
//! mirrors them to a remote host for BI tooling to pick up.
//!
//! ## Overview
//!
//! A run:
//! - **Reads** the active report definitions visible to an organization
//! - **Executes** each base query inside the client/organization scope and
//!   merges it with the report's customization query
//! - **Writes** CSV artifacts into a temporary directory
//! - **Mirrors** the directory to the remote host over ssh/rsync and promotes
//!   it to the local output directory
//! - **Notifies** a webhook with the outcome and the run log
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Workspace, merge engine, remote sync and run coordination
//! - [`adapters`] - External integrations (PostgreSQL, ssh/rsync, webhook)
//! - [`domain`] - Report definitions, result sets and errors
//! - [`config`] - Run parameters and settings
//! - [`logging`] - Structured logging and the per-run log
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bisync::config::{BisyncConfig, SyncParameters};
//! use bisync::core::export::SyncCoordinator;
//! use bisync::core::workspace::Workspace;
//! use bisync::logging::RunLog;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = SyncParameters::parse(&std::env::args().nth(1).unwrap_or_default())?;
//!     let coordinator = SyncCoordinator::new(params, BisyncConfig::default())?;
//!
//!     let workspace = coordinator.workspace();
//!     workspace.ensure_log_dir()?;
//!     let name = Workspace::run_log_file_name(chrono::Local::now());
//!     let run_log = RunLog::create(workspace.log_dir(), &name, "info", "text")?;
//!
//!     let summary = coordinator.run(&run_log).await;
//!     println!("Exported {} reports", summary.exported_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Merging
//!
//! The first column of a base result is its key. When a report has a
//! customization query, the base columns it redefines are dropped and two
//! extra artifacts are produced by left-joining on the key:
//!
//! - `BASE_<name>` with the customization's values for the shared columns
//! - `FULL_<name>` with every customization column
//!
//! The trimmed base is always written as `<prefix><name>`, where the prefix is
//! `EBI_` for vendor reports and the client tag otherwise.
//!
//! ## Error Handling
//!
//! Every failure of a run is a [`domain::BisyncError`]. The coordinator logs
//! it, drops the temporary directory, leaves the previous output untouched and
//! notifies the webhook with the `Error` outcome.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
