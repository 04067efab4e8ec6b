//! Configuration management for bisync.
//!
//! A run takes its inputs from two places:
//!
//! - [`SyncParameters`] - the comma-separated positional argument carrying
//!   connection info, credentials, identifiers and paths for this run
//! - [`BisyncConfig`] - optional TOML settings that tune how the run behaves
//!   (workspace root, artifact naming, transport programs, log format)
//!
//! # Settings file
//!
//! ```toml
//! [application]
//! log_level = "debug"
//!
//! [workspace]
//! root_dir = "${BISYNC_HOME}"
//!
//! [export]
//! file_extension = "csv"
//!
//! [remote]
//! ssh_program = "/usr/bin/ssh"
//! ```
//!
//! `${VAR}` placeholders are substituted from the environment and
//! `BISYNC_<SECTION>_<KEY>` variables override individual values.
//!
//! ```rust,no_run
//! use bisync::config::{load_optional_config, SyncParameters};
//!
//! # fn example(raw: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_optional_config(Some("bisync.toml"))?;
//! let params = SyncParameters::parse(raw)?;
//! params.validate()?;
//! println!("exporting for client {}", params.client_id);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod params;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_default_config, load_optional_config};
pub use params::SyncParameters;
pub use schema::{
    ApplicationConfig, BisyncConfig, DatabaseConfig, ExportConfig, LoggingConfig,
    NotifierConfig, RemoteConfig, WorkspaceConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
