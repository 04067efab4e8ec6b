//! Sync command implementation
//!
//! Runs the whole pipeline for one client/organization pair.

use crate::config::{load_optional_config, SyncParameters};
use crate::core::export::{RunStatus, SyncCoordinator};
use crate::core::workspace::Workspace;
use crate::logging::RunLog;
use chrono::Local;
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Comma-separated run parameters
    #[arg(value_name = "ARGS")]
    pub args: String,

    /// Override the workspace root directory
    #[arg(long)]
    pub workspace: Option<String>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        log_level: Option<&str>,
    ) -> anyhow::Result<i32> {
        let params = match SyncParameters::parse(&self.args) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Invalid run parameters");
                eprintln!("Invalid run parameters: {e}");
                return Ok(2);
            }
        };
        if let Err(e) = params.validate() {
            tracing::error!(error = %e, "Run parameter validation failed");
            eprintln!("Run parameter validation failed: {e}");
            return Ok(2);
        }

        let mut config = match load_optional_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load settings: {e}");
                return Ok(2);
            }
        };
        if let Some(level) = log_level {
            config.application.log_level = level.to_string();
        }
        if let Some(root) = &self.workspace {
            config.workspace.root_dir = root.clone();
        }

        let log_level = config.application.log_level.clone();
        let log_format = config.logging.format.clone();

        let coordinator = match SyncCoordinator::new(params, config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to set up the run: {e}");
                return Ok(2);
            }
        };

        let workspace = coordinator.workspace();
        if let Err(e) = workspace.ensure_log_dir() {
            eprintln!("{e}");
            return Ok(2);
        }

        let file_name = Workspace::run_log_file_name(Local::now());
        let run_log = match RunLog::create(workspace.log_dir(), &file_name, &log_level, &log_format)
        {
            Ok(log) => log,
            Err(e) => {
                eprintln!("Failed to initialize run logging: {e}");
                return Ok(5);
            }
        };

        let summary = coordinator.run(&run_log).await;

        println!();
        println!("Sync Summary:");
        println!("  Reports: {}", summary.reports.len());
        println!("  Exported: {}", summary.exported_count());
        println!("  Skipped: {}", summary.skipped_count());
        println!("  Artifacts: {}", summary.artifact_count());
        println!("  Transferred files: {}", summary.transferred_files);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!("  Log: {}", run_log.path().display());
        if !summary.notified {
            println!("  Notification: not delivered");
        }

        match &summary.status {
            RunStatus::Succeeded => {
                println!("  Outcome: success");
                Ok(0)
            }
            RunStatus::Failed { kind, message } => {
                println!("  Outcome: failed ({kind})");
                println!("  Error: {message}");
                Ok(1)
            }
        }
    }
}
