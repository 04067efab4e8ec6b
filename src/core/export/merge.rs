//! Merge engine
//!
//! Runs each report's base query inside the client/organization scope,
//! reconciles it with the optional customization result and writes the
//! artifacts into the temporary directory.

use super::artifact::ArtifactWriter;
use super::summary::ReportOutcome;
use crate::adapters::database::QueryExecutor;
use crate::adapters::postgresql::sql::scoped_query;
use crate::config::{ExportConfig, SyncParameters};
use crate::domain::{ReportDefinition, Result, ResultSet};
use tracing::{debug, info, warn};

/// Artifact name prefix of the customization-overlay merge
pub const BASE_PREFIX: &str = "BASE_";

/// Artifact name prefix of the full customization merge
pub const FULL_PREFIX: &str = "FULL_";

/// Output of reconciling a base result with a customization result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Base result without the non-key columns the customization redefines
    pub base: ResultSet,
    /// Trimmed base joined with the customization's shared columns
    pub base_merge: Option<ResultSet>,
    /// Trimmed base joined with every customization column
    pub full_merge: Option<ResultSet>,
}

/// Reconcile `base` with `custom` on the first base column
///
/// Shared non-key columns are removed from `base` before either join, so the
/// customization's values take their place. A merge whose right side lacks
/// the key is left out.
pub fn reconcile(mut base: ResultSet, custom: &ResultSet) -> Result<Reconciled> {
    let Some(pk) = base.first_column().map(str::to_string) else {
        return Ok(Reconciled {
            base,
            base_merge: None,
            full_merge: None,
        });
    };

    let shared: Vec<String> = base
        .columns()
        .iter()
        .filter(|c| custom.has_column(c))
        .cloned()
        .collect();
    let redefined: Vec<String> = shared.iter().filter(|c| **c != pk).cloned().collect();
    base.drop_columns(&redefined);

    let projected = custom.project(&shared)?;

    let base_merge = if projected.has_column(&pk) {
        Some(base.left_join(&projected, &pk)?)
    } else {
        None
    };

    let full_merge = if custom.has_column(&pk) {
        Some(base.left_join(custom, &pk)?)
    } else {
        None
    };

    Ok(Reconciled {
        base,
        base_merge,
        full_merge,
    })
}

/// Scope rule a base query must satisfy before it is executed
#[derive(Debug, Clone)]
pub struct ScopeCheck {
    client_alias: String,
    org_alias: String,
}

impl ScopeCheck {
    pub fn new(client_alias: impl Into<String>, org_alias: impl Into<String>) -> Self {
        Self {
            client_alias: client_alias.into().to_uppercase(),
            org_alias: org_alias.into().to_uppercase(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.client_scope_alias, &config.org_scope_alias)
    }

    /// Why `query` cannot be scoped, or `None` if it carries both aliases
    pub fn violation(&self, query: &str) -> Option<String> {
        let upper = query.to_uppercase();
        let mut missing = Vec::new();
        if !upper.contains(&self.client_alias) {
            missing.push(self.client_alias.to_lowercase());
        }
        if !upper.contains(&self.org_alias) {
            missing.push(self.org_alias.to_lowercase());
        }

        if missing.is_empty() {
            None
        } else {
            Some(format!("query lacks '{}'", missing.join("' and '")))
        }
    }
}

/// Turns report definitions into artifacts
pub struct MergeEngine {
    client_id: String,
    org_id: String,
    vendor_prefix: String,
    client_prefix: String,
    scope: ScopeCheck,
    writer: ArtifactWriter,
}

impl MergeEngine {
    pub fn new(params: &SyncParameters, config: &ExportConfig, writer: ArtifactWriter) -> Self {
        Self {
            client_id: params.client_id.clone(),
            org_id: params.org_id.clone(),
            vendor_prefix: config.vendor_prefix.clone(),
            client_prefix: params.client_prefix(),
            scope: ScopeCheck::from_config(config),
            writer,
        }
    }

    /// Process one report
    pub async fn process(
        &self,
        executor: &dyn QueryExecutor,
        report: &ReportDefinition,
    ) -> Result<ReportOutcome> {
        let mut outcome = ReportOutcome::new(&report.name);

        if let Some(reason) = self.scope.violation(&report.base_query) {
            warn!(report = %report.name, reason = %reason, "Skipping report");
            outcome.skipped = Some(reason);
            return Ok(outcome);
        }

        debug!(report = %report.name, "Executing base query");
        let sql = scoped_query(&report.base_query, &self.client_id, &self.org_id);
        let mut base = executor.execute(&sql).await?;

        match &report.custom_query {
            Some(custom_query) => {
                debug!(report = %report.name, "Executing customization query");
                let custom = executor.execute(custom_query).await?;
                let reconciled = reconcile(base, &custom)?;

                match reconciled.base_merge {
                    Some(merged) => {
                        let stem = format!("{BASE_PREFIX}{}", report.name);
                        outcome.artifacts.push(self.writer.write(&stem, &merged)?);
                    }
                    None => {
                        warn!(report = %report.name, "Primary key not found in customization columns, BASE merge skipped");
                        outcome.warnings.push("BASE merge skipped: primary key not found".to_string());
                    }
                }

                match reconciled.full_merge {
                    Some(merged) => {
                        let stem = format!("{FULL_PREFIX}{}", report.name);
                        outcome.artifacts.push(self.writer.write(&stem, &merged)?);
                    }
                    None => {
                        warn!(report = %report.name, "Primary key not found in customization result, FULL merge skipped");
                        outcome.warnings.push("FULL merge skipped: primary key not found".to_string());
                    }
                }

                base = reconciled.base;
            }
            None => {
                info!(report = %report.name, "No customization query");
            }
        }

        let stem = format!("{}{}", self.prefix_for(report), report.name);
        outcome.artifacts.push(self.writer.write(&stem, &base)?);
        outcome.rows = base.row_count();

        info!(
            report = %report.name,
            artifacts = outcome.artifacts.len(),
            rows = outcome.rows,
            "Report exported"
        );
        Ok(outcome)
    }

    fn prefix_for(&self, report: &ReportDefinition) -> &str {
        if report.is_vendor_base {
            &self.vendor_prefix
        } else {
            &self.client_prefix
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn set(columns: &[&str], rows: &[&[Option<&str>]]) -> ResultSet {
        ResultSet::with_rows(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.map(str::to_string)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test_case("SELECT ad_client_id AS clientid, ad_org_id AS orgid FROM t", None ; "both aliases")]
    #[test_case("select AD_CLIENT_ID as CLIENTID, ad_org_id as orgid from t", None ; "mixed case")]
    #[test_case("SELECT ad_org_id as orgid FROM t", Some("query lacks 'ad_client_id as clientid'") ; "missing client alias")]
    #[test_case("SELECT 1", Some("query lacks 'ad_client_id as clientid' and 'ad_org_id as orgid'") ; "missing both")]
    fn test_scope_check(query: &str, expected: Option<&str>) {
        let check = ScopeCheck::new("ad_client_id as clientid", "ad_org_id as orgid");
        assert_eq!(check.violation(query).as_deref(), expected);
    }

    #[test]
    fn test_reconcile_overlays_shared_columns() {
        let base = set(
            &["id", "name", "amount"],
            &[&[Some("1"), Some("a"), Some("10")], &[Some("2"), Some("b"), Some("20")]],
        );
        let custom = set(
            &["id", "name", "extra"],
            &[&[Some("1"), Some("A"), Some("x")]],
        );

        let r = reconcile(base, &custom).unwrap();

        assert_eq!(r.base, set(&["id", "amount"], &[&[Some("1"), Some("10")], &[Some("2"), Some("20")]]));
        assert_eq!(
            r.base_merge.unwrap(),
            set(
                &["id", "amount", "name"],
                &[&[Some("1"), Some("10"), Some("A")], &[Some("2"), Some("20"), None]],
            )
        );
        assert_eq!(
            r.full_merge.unwrap(),
            set(
                &["id", "amount", "name", "extra"],
                &[&[Some("1"), Some("10"), Some("A"), Some("x")], &[Some("2"), Some("20"), None, None]],
            )
        );
    }

    #[test]
    fn test_reconcile_without_key_in_custom() {
        let base = set(&["id", "name"], &[&[Some("1"), Some("a")]]);
        let custom = set(&["code", "name"], &[&[Some("z"), Some("A")]]);

        let r = reconcile(base, &custom).unwrap();

        assert!(r.base_merge.is_none());
        assert!(r.full_merge.is_none());
        assert_eq!(r.base, set(&["id"], &[&[Some("1")]]));
    }

    #[test]
    fn test_reconcile_without_base_columns() {
        let r = reconcile(ResultSet::default(), &set(&["id"], &[])).unwrap();
        assert!(r.base_merge.is_none());
        assert!(r.full_merge.is_none());
    }
}
