//! Init command implementation
//!
//! This module implements the `init` command for generating a settings file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the settings file
    #[arg(short, long, default_value = "bisync.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing settings file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Settings file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, settings_template()) {
            Ok(_) => {
                println!("✅ Settings file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} if the defaults do not fit", self.output);
                println!("  2. Check the run parameters: bisync --config {} validate \"<ARGS>\"", self.output);
                println!("  3. Run: bisync --config {} sync \"<ARGS>\"", self.output);
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write settings file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

/// Commented settings file listing every key with its default
pub fn settings_template() -> &'static str {
    r#"# bisync settings
# Every key is optional; the values below are the defaults.
# ${VAR} placeholders are read from the environment and
# BISYNC_<SECTION>_<KEY> variables override single values.

[application]
log_level = "info"  # trace | debug | info | warn | error

[workspace]
# Directory holding <client>/<org>_output, _tmp and _logs
root_dir = "."

[export]
vendor_prefix = "EBI_"
file_extension = "csv"
# Base queries must expose both aliases to be exported
client_scope_alias = "ad_client_id as clientid"
org_scope_alias = "ad_org_id as orgid"

[database]
connect_timeout_seconds = 30
statement_timeout_seconds = 0  # 0 disables the timeout
application_name = "bisync"

[remote]
ssh_program = "ssh"
rsync_program = "rsync"

[notifier]
rule_id = "649BBFA37BA74FA59AEBE7F28524B0C8"
timeout_seconds = 30

[logging]
format = "text"  # text | json
"#
}
