//! Settings schema types
//!
//! Optional TOML settings that tune a run. Every field has a default, so a
//! run without a settings file behaves exactly like the defaults below.

use serde::{Deserialize, Serialize};

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BisyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Local workspace layout
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Artifact naming and scope aliases
    #[serde(default)]
    pub export: ExportConfig,

    /// Metadata store session settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Remote transport programs
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Webhook notification settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Run log settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BisyncConfig {
    /// Validates the settings
    ///
    /// # Errors
    ///
    /// Returns an error if any settings values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.workspace.validate()?;
        self.export.validate()?;
        self.remote.validate()?;
        self.notifier.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Local workspace layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory the `<client>/<org>_*` folders are created under
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
}

impl WorkspaceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root_dir.trim().is_empty() {
            return Err("workspace.root_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
        }
    }
}

/// Artifact naming and scope aliases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Prefix for vendor-sourced report artifacts
    #[serde(default = "default_vendor_prefix")]
    pub vendor_prefix: String,

    /// Artifact file extension, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Text a base query must contain to expose the client scope column
    #[serde(default = "default_client_scope_alias")]
    pub client_scope_alias: String,

    /// Text a base query must contain to expose the organization scope column
    #[serde(default = "default_org_scope_alias")]
    pub org_scope_alias: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_extension.is_empty() || self.file_extension.contains(['.', '/']) {
            return Err(format!(
                "export.file_extension must be a bare extension, got '{}'",
                self.file_extension
            ));
        }
        if self.client_scope_alias.trim().is_empty() || self.org_scope_alias.trim().is_empty() {
            return Err("export scope aliases cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            vendor_prefix: default_vendor_prefix(),
            file_extension: default_file_extension(),
            client_scope_alias: default_client_scope_alias(),
            org_scope_alias: default_org_scope_alias(),
        }
    }
}

/// Metadata store session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Statement timeout in seconds (0 = server default)
    #[serde(default)]
    pub statement_timeout_seconds: u64,

    /// Application name reported to the server
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: default_connect_timeout_seconds(),
            statement_timeout_seconds: 0,
            application_name: default_application_name(),
        }
    }
}

/// Remote transport programs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Secure shell client
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,

    /// Mirroring transfer client
    #[serde(default = "default_rsync_program")]
    pub rsync_program: String,
}

impl RemoteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.ssh_program.trim().is_empty() || self.rsync_program.trim().is_empty() {
            return Err("remote.ssh_program and remote.rsync_program cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            ssh_program: default_ssh_program(),
            rsync_program: default_rsync_program(),
        }
    }
}

/// Webhook notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Rule identifier sent with every notification
    #[serde(default = "default_rule_id")]
    pub rule_id: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_notifier_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl NotifierConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("notifier.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            rule_id: default_rule_id(),
            timeout_seconds: default_notifier_timeout_seconds(),
        }
    }
}

/// Run log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Run log file format (text or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid logging.format '{}'. Must be one of: {}",
                self.format,
                valid_formats.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_root_dir() -> String {
    ".".to_string()
}

fn default_vendor_prefix() -> String {
    "EBI_".to_string()
}

fn default_file_extension() -> String {
    "csv".to_string()
}

fn default_client_scope_alias() -> String {
    "ad_client_id as clientid".to_string()
}

fn default_org_scope_alias() -> String {
    "ad_org_id as orgid".to_string()
}

fn default_connect_timeout_seconds() -> u64 {
    30
}

fn default_application_name() -> String {
    "bisync".to_string()
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_rsync_program() -> String {
    "rsync".to_string()
}

fn default_rule_id() -> String {
    "649BBFA37BA74FA59AEBE7F28524B0C8".to_string()
}

fn default_notifier_timeout_seconds() -> u64 {
    30
}

fn default_log_format() -> String {
    "text".to_string()
}
