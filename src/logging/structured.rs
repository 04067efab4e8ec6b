//! Structured logging setup using tracing
//!
//! Console logging for commands that run outside a sync run, plus the layer
//! builders the per-run [`RunLog`](super::RunLog) reuses.
//!
//! # Example
//!
//! ```no_run
//! use bisync::logging::init_logging;
//!
//! init_logging("info").expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```

use crate::domain::{BisyncError, Result};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Boxed layer over the plain registry
pub(crate) type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the process-wide console subscriber
///
/// # Arguments
///
/// * `log_level_str` - Log level as a string (trace, debug, info, warn, error)
pub fn init_logging(log_level_str: &str) -> Result<()> {
    let filter = env_filter(log_level_str)?;

    tracing_subscriber::registry()
        .with(console_layer(filter))
        .try_init()
        .map_err(|e| BisyncError::Configuration(format!("Failed to install logger: {e}")))?;

    Ok(())
}

/// `RUST_LOG` when set, otherwise `bisync=<level>`
pub(crate) fn env_filter(log_level_str: &str) -> Result<EnvFilter> {
    let log_level = parse_log_level(log_level_str)?;
    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bisync={}", log_level))))
}

pub(crate) fn console_layer(filter: EnvFilter) -> BoxedLayer {
    tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .boxed()
}

/// Parse log level from string
pub(crate) fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(BisyncError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}
