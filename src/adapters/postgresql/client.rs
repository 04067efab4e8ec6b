//! PostgreSQL session for the metadata store
//!
//! A run opens exactly one connection, switches it to read-only and keeps it
//! until the coordinator closes it in its final step.

use super::rows::{report_from_row, result_set_from_messages};
use super::sql::{CATALOG_QUERY, READ_ONLY_SESSION};
use crate::adapters::database::{QueryExecutor, ReportCatalog, StoreConnector, StoreSession};
use crate::config::{DatabaseConfig, SyncParameters};
use crate::domain::{BisyncError, ReportDefinition, Result, ResultSet};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

/// Opens read-only PostgreSQL sessions
pub struct PostgresConnector {
    pg_config: tokio_postgres::Config,
    statement_timeout_seconds: u64,
}

impl PostgresConnector {
    /// Build a connector from the run parameters
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the database port is not a valid port number.
    pub fn new(params: &SyncParameters, config: &DatabaseConfig) -> Result<Self> {
        let port = params.database_port_number().map_err(|e| {
            BisyncError::Configuration(format!(
                "Invalid database port '{}': {e}",
                params.database_port
            ))
        })?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&params.database_host)
            .port(port)
            .dbname(&params.database_name)
            .user(&params.database_user)
            .password(params.database_password.expose_secret().as_str())
            .application_name(&config.application_name);

        if config.connect_timeout_seconds > 0 {
            pg_config.connect_timeout(Duration::from_secs(config.connect_timeout_seconds));
        }

        Ok(Self {
            pg_config,
            statement_timeout_seconds: config.statement_timeout_seconds,
        })
    }
}

#[async_trait]
impl StoreConnector for PostgresConnector {
    async fn connect(&self) -> Result<Box<dyn StoreSession>> {
        let (client, connection) = self.pg_config.connect(NoTls).await.map_err(|e| {
            BisyncError::Connectivity(format!("Failed to connect to the metadata store: {e}"))
        })?;

        let connection_task = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "Metadata store connection ended with an error");
            }
        });

        let session = PgSession {
            client,
            connection_task,
        };

        session.configure(self.statement_timeout_seconds).await?;
        tracing::info!("Connected to the metadata store");

        Ok(Box::new(session))
    }
}

/// A single read-only connection
pub struct PgSession {
    client: Client,
    connection_task: JoinHandle<()>,
}

impl PgSession {
    async fn configure(&self, statement_timeout_seconds: u64) -> Result<()> {
        self.client
            .batch_execute(READ_ONLY_SESSION)
            .await
            .map_err(|e| map_store_error("Failed to make the session read-only", e))?;

        if statement_timeout_seconds > 0 {
            let statement = format!(
                "SET statement_timeout = {}",
                statement_timeout_seconds.saturating_mul(1000)
            );
            self.client
                .batch_execute(&statement)
                .await
                .map_err(|e| map_store_error("Failed to set the statement timeout", e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for PgSession {
    async fn execute(&self, sql: &str) -> Result<ResultSet> {
        let messages = self
            .client
            .simple_query(sql)
            .await
            .map_err(|e| map_store_error("Query failed", e))?;

        result_set_from_messages(messages)
    }
}

#[async_trait]
impl ReportCatalog for PgSession {
    async fn load_reports(&self, client_id: &str, org_id: &str) -> Result<Vec<ReportDefinition>> {
        let rows = self
            .client
            .query(CATALOG_QUERY, &[&client_id, &org_id])
            .await
            .map_err(|e| map_store_error("Failed to read the query catalog", e))?;

        tracing::debug!(count = rows.len(), "Loaded report definitions");
        rows.iter().map(report_from_row).collect()
    }
}

#[async_trait]
impl StoreSession for PgSession {
    fn as_executor(&self) -> &dyn QueryExecutor {
        self
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let PgSession {
            client,
            connection_task,
        } = *self;

        drop(client);
        connection_task
            .await
            .map_err(|e| BisyncError::Uncaught(format!("Connection task failed: {e}")))
    }
}

/// Lost connections are connectivity failures; anything else is a query failure
fn map_store_error(context: &str, error: tokio_postgres::Error) -> BisyncError {
    if error.is_closed() {
        BisyncError::Connectivity(format!("{context}: {error}"))
    } else {
        BisyncError::QueryExecution(format!("{context}: {error}"))
    }
}
