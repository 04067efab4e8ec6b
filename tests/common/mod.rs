//! In-memory fakes shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bisync::adapters::database::{QueryExecutor, ReportCatalog, StoreConnector, StoreSession};
use bisync::adapters::postgresql::sql::scoped_query;
use bisync::adapters::remote::RemoteTransport;
use bisync::adapters::webhook::{Notifier, RunNotification};
use bisync::config::SyncParameters;
use bisync::domain::{BisyncError, ReportDefinition, Result, ResultSet};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const CLIENT_ID: &str = "C1";
pub const ORG_ID: &str = "O1";

/// Run parameters for client `Acme Corp`, organization `Main & Co`
pub fn params() -> SyncParameters {
    SyncParameters::parse(
        "bi,db.local,5432,C1,O1,hook,key,Main & Co,;,Acme Corp,bi,sftp.local,2222,/srv/bi,ro,pw,,https://erp.local/etendo",
    )
    .unwrap()
}

pub fn rows(columns: &[&str], values: &[&[Option<&str>]]) -> ResultSet {
    ResultSet::with_rows(
        columns.iter().map(|c| c.to_string()).collect(),
        values
            .iter()
            .map(|r| r.iter().map(|v| v.map(str::to_string)).collect())
            .collect(),
    )
    .unwrap()
}

/// Query results keyed by SQL text
#[derive(Default)]
pub struct MemoryStore {
    reports: Vec<ReportDefinition>,
    results: HashMap<String, ResultSet>,
    executed: Mutex<Vec<String>>,
    closed: AtomicBool,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Register a report and the result of its scoped base query
    pub fn with_report(mut self, report: ReportDefinition, base: ResultSet) -> Self {
        let sql = scoped_query(&report.base_query, CLIENT_ID, ORG_ID);
        self.results.insert(sql, base);
        self.reports.push(report);
        self
    }

    pub fn with_result(mut self, sql: &str, result: ResultSet) -> Self {
        self.results.insert(sql.to_string(), result);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryExecutor for MemoryStore {
    async fn execute(&self, sql: &str) -> Result<ResultSet> {
        self.executed.lock().unwrap().push(sql.to_string());
        self.results
            .get(sql)
            .cloned()
            .ok_or_else(|| BisyncError::QueryExecution(format!("relation does not exist: {sql}")))
    }
}

/// Session handle over a shared [`MemoryStore`]
pub struct MemorySession(pub Arc<MemoryStore>);

#[async_trait]
impl QueryExecutor for MemorySession {
    async fn execute(&self, sql: &str) -> Result<ResultSet> {
        self.0.execute(sql).await
    }
}

#[async_trait]
impl ReportCatalog for MemorySession {
    async fn load_reports(&self, client_id: &str, org_id: &str) -> Result<Vec<ReportDefinition>> {
        assert_eq!((client_id, org_id), (CLIENT_ID, ORG_ID));
        Ok(self.0.reports.clone())
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    fn as_executor(&self) -> &dyn QueryExecutor {
        self
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.0.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MemoryConnector(pub Arc<MemoryStore>);

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn StoreSession>> {
        if self.0.unreachable {
            return Err(BisyncError::Connectivity("connection refused".to_string()));
        }
        Ok(Box::new(MemorySession(self.0.clone())))
    }
}

/// One mirror call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCall {
    pub local_dir: PathBuf,
    pub remote_dir: String,
    pub delete_extraneous: bool,
    pub files: Vec<String>,
}

/// Transport recording every call
#[derive(Default)]
pub struct FakeTransport {
    pub probe_answer: Option<String>,
    pub existing: Mutex<HashSet<String>>,
    pub fail_mkdir: bool,
    pub fail_mirror: bool,
    pub created: Mutex<Vec<String>>,
    pub mirrors: Mutex<Vec<MirrorCall>>,
}

impl FakeTransport {
    /// A reachable host where `paths` exist
    pub fn reachable(paths: &[&str]) -> Self {
        Self {
            probe_answer: Some("1".to_string()),
            existing: Mutex::new(paths.iter().map(|p| p.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self {
            probe_answer: Some(answer.to_string()),
            ..Self::default()
        }
    }

    pub fn mirrors(&self) -> Vec<MirrorCall> {
        self.mirrors.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteTransport for FakeTransport {
    async fn probe(&self) -> Result<()> {
        match self.probe_answer.as_deref().map(str::trim) {
            Some("1") => Ok(()),
            other => Err(BisyncError::RemoteUnreachable(format!(
                "sftp.local answered {other:?}"
            ))),
        }
    }

    async fn path_exists(&self, path: &str) -> Result<bool> {
        Ok(self.existing.lock().unwrap().contains(path))
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        if self.fail_mkdir {
            return Err(BisyncError::Transfer(format!("mkdir {path}: permission denied")));
        }
        self.created.lock().unwrap().push(path.to_string());
        self.existing.lock().unwrap().insert(path.to_string());
        Ok(())
    }

    async fn mirror(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        delete_extraneous: bool,
        _transfer_log: &Path,
    ) -> Result<()> {
        if self.fail_mirror {
            return Err(BisyncError::Transfer("rsync exited with 23".to_string()));
        }
        let mut files: Vec<String> = std::fs::read_dir(local_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        files.sort();
        self.mirrors.lock().unwrap().push(MirrorCall {
            local_dir: local_dir.to_path_buf(),
            remote_dir: remote_dir.to_string(),
            delete_extraneous,
            files,
        });
        Ok(())
    }
}

/// Transport handle over a shared [`FakeTransport`]
pub struct SharedTransport(pub Arc<FakeTransport>);

#[async_trait]
impl RemoteTransport for SharedTransport {
    async fn probe(&self) -> Result<()> {
        self.0.probe().await
    }

    async fn path_exists(&self, path: &str) -> Result<bool> {
        self.0.path_exists(path).await
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        self.0.ensure_dir(path).await
    }

    async fn mirror(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        delete_extraneous: bool,
        transfer_log: &Path,
    ) -> Result<()> {
        self.0
            .mirror(local_dir, remote_dir, delete_extraneous, transfer_log)
            .await
    }
}

/// Notifier keeping every notification
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<RunNotification>>,
    pub reject: bool,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<RunNotification> {
        self.sent.lock().unwrap().clone()
    }
}

pub struct SharedNotifier(pub Arc<RecordingNotifier>);

#[async_trait]
impl Notifier for SharedNotifier {
    async fn notify(&self, notification: &RunNotification) -> Result<()> {
        self.0.sent.lock().unwrap().push(notification.clone());
        if self.0.reject {
            return Err(BisyncError::Notification("webhook returned 500".to_string()));
        }
        Ok(())
    }
}
