// bisync - BI report export and remote sync
// Copyright (c) 2025 Bisync Contributors
// Licensed under the MIT License

use bisync::cli::{Cli, Commands};
use bisync::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console logging for everything outside a sync run; a run logs through
    // its own dispatcher
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    if let Err(e) = init_logging(log_level) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(5);
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "bisync starting");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Sync(args) => args.execute(config_path, cli.log_level.as_deref()).await,
        Commands::Validate(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
