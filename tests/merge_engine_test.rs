//! Integration tests for the merge engine against an in-memory store

mod common;

use bisync::config::ExportConfig;
use bisync::core::export::{read_artifact, ArtifactWriter, MergeEngine};
use bisync::domain::{BisyncError, ReportDefinition};
use bisync::logging::RunLog;
use common::{params, rows, MemoryStore};
use std::fs;
use tempfile::TempDir;
use test_case::test_case;
use tracing::instrument::WithSubscriber;

const SCOPED: &str = "SELECT ad_client_id AS clientid, ad_org_id AS orgid, id, name FROM sales";

fn engine(dir: &TempDir) -> MergeEngine {
    let writer = ArtifactWriter::new(dir.path(), b';', "csv");
    MergeEngine::new(&params(), &ExportConfig::default(), writer)
}

fn files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_vendor_report_without_customization() {
    let dir = TempDir::new().unwrap();
    let base = rows(
        &["clientid", "orgid", "id", "name"],
        &[&[Some("C1"), Some("0"), Some("1"), Some("a")]],
    );
    let report = ReportDefinition::new("sales", SCOPED).vendor_base();
    let store = MemoryStore::new().with_report(report.clone(), base.clone());

    let outcome = engine(&dir).process(&store, &report).await.unwrap();

    assert_eq!(outcome.artifacts, vec!["EBI_sales.csv"]);
    assert_eq!(outcome.rows, 1);
    assert_eq!(files(&dir), vec!["EBI_sales.csv"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("EBI_sales.csv")).unwrap(),
        "clientid;orgid;id;name\nC1;0;1;a\n"
    );
    assert_eq!(read_artifact(&dir.path().join("EBI_sales.csv"), b';').unwrap(), base);
}

#[tokio::test]
async fn test_tenant_report_uses_client_prefix() {
    let dir = TempDir::new().unwrap();
    let report = ReportDefinition::new("sales", SCOPED);
    let store = MemoryStore::new().with_report(report.clone(), rows(&["id"], &[]));

    let outcome = engine(&dir).process(&store, &report).await.unwrap();

    assert_eq!(outcome.artifacts, vec!["Acm_sales.csv"]);
}

#[test_case("SELECT id FROM sales" ; "no aliases")]
#[test_case("SELECT ad_client_id AS clientid, id FROM sales" ; "no org alias")]
#[test_case("SELECT ad_org_id AS orgid, id FROM sales" ; "no client alias")]
#[tokio::test]
async fn test_unscoped_report_is_skipped(query: &str) {
    let dir = TempDir::new().unwrap();
    let report = ReportDefinition::new("raw", query);
    let store = MemoryStore::new();

    let outcome = engine(&dir).process(&store, &report).await.unwrap();

    assert!(outcome.is_skipped());
    assert!(outcome.artifacts.is_empty());
    assert!(store.executed().is_empty());
    assert!(files(&dir).is_empty());
}

#[tokio::test]
async fn test_skipped_report_is_recorded_at_default_level() {
    let dir = TempDir::new().unwrap();
    let logs = TempDir::new().unwrap();
    let run_log = RunLog::create(logs.path(), "bisync.log.skip", "info", "text").unwrap();
    let report = ReportDefinition::new("unscoped_report", "SELECT id FROM t");
    let store = MemoryStore::new();

    let outcome = engine(&dir)
        .process(&store, &report)
        .with_subscriber(run_log.dispatch())
        .await
        .unwrap();

    assert!(outcome.skipped.is_some());
    let captured = run_log.captured_text().unwrap();
    assert!(captured.contains("unscoped_report"), "captured: {captured}");
    assert!(captured.contains("Skipping report"));
}

#[tokio::test]
async fn test_customization_produces_three_artifacts() {
    let dir = TempDir::new().unwrap();
    let base = rows(
        &["id", "clientid", "name", "amount"],
        &[
            &[Some("1"), Some("C1"), Some("a"), Some("10")],
            &[Some("2"), Some("C1"), Some("b"), Some("20")],
        ],
    );
    let custom = rows(
        &["id", "name", "region"],
        &[&[Some("1"), Some("A"), Some("north")]],
    );
    let report = ReportDefinition::new("sales", SCOPED)
        .vendor_base()
        .with_custom_query("SELECT id, name, region FROM sales_custom");
    let store = MemoryStore::new()
        .with_report(report.clone(), base)
        .with_result("SELECT id, name, region FROM sales_custom", custom);

    let outcome = engine(&dir).process(&store, &report).await.unwrap();

    assert_eq!(
        outcome.artifacts,
        vec!["BASE_sales.csv", "FULL_sales.csv", "EBI_sales.csv"]
    );
    assert!(outcome.warnings.is_empty());

    let base_merge = read_artifact(&dir.path().join("BASE_sales.csv"), b';').unwrap();
    assert_eq!(
        base_merge,
        rows(
            &["id", "clientid", "amount", "name"],
            &[
                &[Some("1"), Some("C1"), Some("10"), Some("A")],
                &[Some("2"), Some("C1"), Some("20"), None],
            ],
        )
    );

    let full_merge = read_artifact(&dir.path().join("FULL_sales.csv"), b';').unwrap();
    assert_eq!(
        full_merge.columns(),
        &["id", "clientid", "amount", "name", "region"]
    );
    assert_eq!(full_merge.row_count(), 2);

    // The prefixed artifact holds the base without the redefined columns
    let trimmed = read_artifact(&dir.path().join("EBI_sales.csv"), b';').unwrap();
    assert_eq!(trimmed.columns(), &["id", "clientid", "amount"]);
}

#[tokio::test]
async fn test_customization_without_primary_key() {
    let dir = TempDir::new().unwrap();
    let base = rows(&["id", "name"], &[&[Some("1"), Some("a")]]);
    let custom = rows(&["code", "label"], &[&[Some("x"), Some("X")]]);
    let report = ReportDefinition::new("stock", SCOPED)
        .vendor_base()
        .with_custom_query("SELECT code, label FROM stock_custom");
    let store = MemoryStore::new()
        .with_report(report.clone(), base.clone())
        .with_result("SELECT code, label FROM stock_custom", custom);

    let outcome = engine(&dir).process(&store, &report).await.unwrap();

    assert_eq!(outcome.artifacts, vec!["EBI_stock.csv"]);
    assert_eq!(outcome.warnings.len(), 2);
    assert_eq!(files(&dir), vec!["EBI_stock.csv"]);
    assert_eq!(read_artifact(&dir.path().join("EBI_stock.csv"), b';').unwrap(), base);
}

#[tokio::test]
async fn test_left_join_keeps_every_base_row() {
    let dir = TempDir::new().unwrap();
    let base = rows(
        &["id", "name"],
        &[
            &[Some("1"), Some("a")],
            &[Some("2"), Some("b")],
            &[None, Some("c")],
        ],
    );
    let custom = rows(&["id", "extra"], &[&[Some("9"), Some("z")]]);
    let report = ReportDefinition::new("orders", SCOPED)
        .vendor_base()
        .with_custom_query("SELECT id, extra FROM orders_custom");
    let store = MemoryStore::new()
        .with_report(report.clone(), base)
        .with_result("SELECT id, extra FROM orders_custom", custom);

    engine(&dir).process(&store, &report).await.unwrap();

    let full = read_artifact(&dir.path().join("FULL_orders.csv"), b';').unwrap();
    assert_eq!(full.row_count(), 3);
    assert!(full.rows().iter().all(|r| r[2].is_none()));
}

#[tokio::test]
async fn test_base_query_runs_inside_scope_filter() {
    let dir = TempDir::new().unwrap();
    let report = ReportDefinition::new("sales", SCOPED).vendor_base();
    let store = MemoryStore::new().with_report(report.clone(), rows(&["id"], &[]));

    engine(&dir).process(&store, &report).await.unwrap();

    let executed = store.executed();
    assert_eq!(executed.len(), 1);
    assert!(executed[0].starts_with(&format!("SELECT * FROM ({SCOPED}) AS q")));
    assert!(executed[0].contains("q.clientid = 'C1'"));
    assert!(executed[0].contains("ad_isorgincluded(q.orgid, 'O1', 'C1') <> -1 OR q.orgid = '0'"));
}

#[tokio::test]
async fn test_query_failure_aborts() {
    let dir = TempDir::new().unwrap();
    let report = ReportDefinition::new("sales", SCOPED)
        .with_custom_query("SELECT broken FROM nowhere");
    let store = MemoryStore::new().with_report(report.clone(), rows(&["id"], &[]));

    let result = engine(&dir).process(&store, &report).await;

    assert!(matches!(result, Err(BisyncError::QueryExecution(_))));
    assert!(files(&dir).is_empty());
}
