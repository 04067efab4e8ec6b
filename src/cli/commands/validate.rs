//! Validate command implementation
//!
//! Checks the run parameters without touching the network and, on request,
//! inspects the query catalog the run would export.

use crate::adapters::database::StoreConnector;
use crate::adapters::postgresql::PostgresConnector;
use crate::config::{load_optional_config, SyncParameters};
use crate::core::export::ScopeCheck;
use crate::domain::ReportDefinition;
use clap::Args;

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Comma-separated run parameters
    #[arg(value_name = "ARGS")]
    pub args: String,

    /// Connect to the metadata store and check every report definition
    #[arg(long)]
    pub check_catalog: bool,
}

impl ValidateArgs {
    /// Execute the validate command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        println!("🔍 Validating run parameters");
        println!();

        let params = match SyncParameters::parse(&self.args) {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Failed to parse run parameters");
                println!("   Error: {e}");
                return Ok(2);
            }
        };
        if let Err(e) = params.validate() {
            println!("❌ Run parameters are invalid");
            println!("   Error: {e}");
            return Ok(2);
        }

        let config = match load_optional_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load settings");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Run parameters are valid");
        println!();
        println!("Run Summary:");
        println!(
            "  Metadata store: {}@{}:{}/{}",
            params.database_user, params.database_host, params.database_port, params.database_name
        );
        println!("  Client: {} ({})", params.client_name, params.client_id);
        println!("  Organization: {} ({})", params.org_name, params.org_id);
        println!(
            "  Remote: {}@{}:{} {}",
            params.remote_user, params.remote_host, params.remote_port, params.remote_path
        );
        println!("  Delimiter: '{}'", params.delimiter);
        println!("  Webhook: {}", params.webhook_endpoint());
        println!();

        if !self.check_catalog {
            return Ok(0);
        }

        let connector = PostgresConnector::new(&params, &config.database)?;
        let session = match connector.connect().await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ {e}");
                return Ok(1);
            }
        };

        let reports = session
            .load_reports(&params.client_id, &params.org_id)
            .await;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Failed to close the metadata store session");
        }
        let reports = match reports {
            Ok(r) => r,
            Err(e) => {
                println!("❌ {e}");
                return Ok(1);
            }
        };

        let scope = ScopeCheck::from_config(&config.export);
        let mut problems = 0;
        println!("Query catalog ({} definitions):", reports.len());
        for report in &reports {
            let issues = definition_issues(report, &scope);
            if issues.is_empty() {
                println!("  ✅ {}", report.name);
            } else {
                problems += 1;
                println!("  ⚠️  {}", report.name);
                for issue in issues {
                    println!("     - {issue}");
                }
            }
        }

        Ok(if problems == 0 { 0 } else { 1 })
    }
}

/// Problems a run would hit with `report`
pub fn definition_issues(report: &ReportDefinition, scope: &ScopeCheck) -> Vec<String> {
    let mut issues = Vec::new();
    if !starts_with_select(&report.base_query) {
        issues.push("base query does not start with SELECT".to_string());
    }
    if let Some(custom) = &report.custom_query {
        if !starts_with_select(custom) {
            issues.push("customization query does not start with SELECT".to_string());
        }
    }
    if let Some(reason) = scope.violation(&report.base_query) {
        issues.push(format!("{reason}, the report will be skipped"));
    }
    issues
}

fn starts_with_select(query: &str) -> bool {
    query
        .trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("select"))
}
