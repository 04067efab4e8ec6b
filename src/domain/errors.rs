//! Domain error types
//!
//! This module defines the error taxonomy for a sync run. Every failure the
//! pipeline can hit maps to one variant, and the coordinator applies the same
//! recovery to all of them. Errors don't expose third-party types.

use thiserror::Error;

/// Main bisync error type
#[derive(Debug, Error)]
pub enum BisyncError {
    /// Invocation parameters or settings are invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The metadata store could not be reached
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// A catalog, base or customization query failed
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// The remote host did not answer the liveness probe
    #[error("Remote host unreachable: {0}")]
    RemoteUnreachable(String),

    /// The configured remote base path does not exist
    #[error("Remote path missing: {0}")]
    RemoteMissingPath(String),

    /// Remote directory creation or the mirror step failed
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Local filesystem errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The webhook notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Uncaught(String),
}

impl BisyncError {
    /// Short, stable label for the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            BisyncError::Configuration(_) => "configuration",
            BisyncError::Connectivity(_) => "connectivity",
            BisyncError::QueryExecution(_) => "query_execution",
            BisyncError::RemoteUnreachable(_) => "remote_unreachable",
            BisyncError::RemoteMissingPath(_) => "remote_missing_path",
            BisyncError::Transfer(_) => "transfer",
            BisyncError::Io(_) => "io",
            BisyncError::Notification(_) => "notification",
            BisyncError::Uncaught(_) => "uncaught",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BisyncError {
    fn from(err: std::io::Error) -> Self {
        BisyncError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BisyncError {
    fn from(err: toml::de::Error) -> Self {
        BisyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors (artifact read/write)
impl From<csv::Error> for BisyncError {
    fn from(err: csv::Error) -> Self {
        BisyncError::Io(format!("CSV error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BisyncError::RemoteUnreachable("10.0.0.1".to_string());
        assert_eq!(err.to_string(), "Remote host unreachable: 10.0.0.1");
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(
            BisyncError::Connectivity("x".into()).kind(),
            "connectivity"
        );
        assert_eq!(BisyncError::Transfer("x".into()).kind(), "transfer");
        assert_eq!(BisyncError::Uncaught("x".into()).kind(), "uncaught");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: BisyncError = io_err.into();
        assert!(matches!(err, BisyncError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: BisyncError = toml_err.into();
        assert!(matches!(err, BisyncError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = BisyncError::Notification("timeout".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
