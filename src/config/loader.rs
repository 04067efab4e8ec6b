//! Settings loader with TOML parsing and environment variable overrides

use super::schema::BisyncConfig;
use crate::domain::errors::BisyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads settings from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BisyncConfig
/// 4. Applies environment variable overrides (BISYNC_* prefix)
/// 5. Validates the settings
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use bisync::config::loader::load_config;
///
/// let config = load_config("bisync.toml").expect("Failed to load settings");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BisyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BisyncError::Configuration(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BisyncError::Configuration(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: BisyncConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        BisyncError::Configuration(format!("Settings validation failed: {}", e))
    })?;

    Ok(config)
}

/// Builds settings from defaults plus environment overrides
///
/// Used when no settings file is given.
pub fn load_default_config() -> Result<BisyncConfig> {
    let mut config = BisyncConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        BisyncError::Configuration(format!("Settings validation failed: {}", e))
    })?;
    Ok(config)
}

/// Loads `path` when given, otherwise falls back to [`load_default_config`]
pub fn load_optional_config(path: Option<&str>) -> Result<BisyncConfig> {
    match path {
        Some(path) => load_config(path),
        None => load_default_config(),
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BisyncError::Uncaught(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BisyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the BISYNC_* prefix
///
/// Environment variables follow the pattern BISYNC_<SECTION>_<KEY>, for
/// example BISYNC_WORKSPACE_ROOT_DIR or BISYNC_REMOTE_SSH_PROGRAM.
fn apply_env_overrides(config: &mut BisyncConfig) {
    if let Ok(val) = std::env::var("BISYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("BISYNC_WORKSPACE_ROOT_DIR") {
        config.workspace.root_dir = val;
    }

    if let Ok(val) = std::env::var("BISYNC_EXPORT_VENDOR_PREFIX") {
        config.export.vendor_prefix = val;
    }
    if let Ok(val) = std::env::var("BISYNC_EXPORT_FILE_EXTENSION") {
        config.export.file_extension = val;
    }

    if let Ok(val) = std::env::var("BISYNC_DATABASE_CONNECT_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.database.connect_timeout_seconds = secs;
        }
    }
    if let Ok(val) = std::env::var("BISYNC_DATABASE_STATEMENT_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.database.statement_timeout_seconds = secs;
        }
    }

    if let Ok(val) = std::env::var("BISYNC_REMOTE_SSH_PROGRAM") {
        config.remote.ssh_program = val;
    }
    if let Ok(val) = std::env::var("BISYNC_REMOTE_RSYNC_PROGRAM") {
        config.remote.rsync_program = val;
    }

    if let Ok(val) = std::env::var("BISYNC_NOTIFIER_RULE_ID") {
        config.notifier.rule_id = val;
    }
    if let Ok(val) = std::env::var("BISYNC_NOTIFIER_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.notifier.timeout_seconds = secs;
        }
    }

    if let Ok(val) = std::env::var("BISYNC_LOGGING_FORMAT") {
        config.logging.format = val;
    }
}
