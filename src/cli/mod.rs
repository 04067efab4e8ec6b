//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for bisync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// bisync - BI report export and remote sync
#[derive(Parser, Debug)]
#[command(name = "bisync")]
#[command(version, about, long_about = None)]
#[command(author = "Bisync Contributors")]
pub struct Cli {
    /// Path to an optional settings file
    #[arg(short, long, env = "BISYNC_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BISYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the report catalog and sync it to the remote host
    Sync(commands::sync::SyncArgs),

    /// Validate run parameters, optionally checking the query catalog
    Validate(commands::validate::ValidateArgs),

    /// Initialize a new settings file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARGS: &str = "bi,db,5432,C1,O1,hook,key,Main,;,Acme,bi,sftp,22,/srv,ro,pw,,https://erp.local";

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["bisync", "sync", ARGS]);
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Sync(args) => assert_eq!(args.args, ARGS),
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["bisync", "--config", "custom.toml", "sync", ARGS]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["bisync", "--log-level", "debug", "sync", ARGS]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["bisync", "validate", ARGS, "--check-catalog"]);
        match cli.command {
            Commands::Validate(args) => assert!(args.check_catalog),
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["bisync", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
