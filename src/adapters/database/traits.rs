//! Metadata store abstraction traits
//!
//! The pipeline talks to the store through these traits so the merge engine
//! and the coordinator can run against an in-memory store in tests.

use crate::domain::{ReportDefinition, Result, ResultSet};
use async_trait::async_trait;

/// Executes SQL text and returns the result rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute a query
    ///
    /// # Errors
    ///
    /// Returns `QueryExecution` if the query is malformed or fails.
    async fn execute(&self, sql: &str) -> Result<ResultSet>;
}

/// Source of report definitions
#[async_trait]
pub trait ReportCatalog: Send + Sync {
    /// Load the active report definitions visible to `org_id` under `client_id`,
    /// in store order
    async fn load_reports(&self, client_id: &str, org_id: &str) -> Result<Vec<ReportDefinition>>;
}

/// One read-only session with the store, scoped to a run
#[async_trait]
pub trait StoreSession: QueryExecutor + ReportCatalog {
    /// View the session as a plain query executor
    fn as_executor(&self) -> &dyn QueryExecutor;

    /// Release the connection
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Opens store sessions
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Open a read-only session
    ///
    /// # Errors
    ///
    /// Returns `Connectivity` if the store cannot be reached.
    async fn connect(&self) -> Result<Box<dyn StoreSession>>;
}
