//! Sync coordinator - main orchestrator of a run
//!
//! Drives the pipeline strictly forward: workspace, catalog, merge engine,
//! remote sync. Every error lands in one dispatch point that logs it, drops
//! the temporary directory and sends the `Error` notification. The run is
//! notified exactly once and the store session is closed last.

use crate::adapters::database::{StoreConnector, StoreSession};
use crate::adapters::postgresql::PostgresConnector;
use crate::adapters::remote::{RemoteTransport, SshTransport};
use crate::adapters::webhook::{Notifier, RunNotification, WebhookNotifier};
use crate::config::{BisyncConfig, SyncParameters};
use crate::core::export::artifact::ArtifactWriter;
use crate::core::export::merge::MergeEngine;
use crate::core::export::summary::RunSummary;
use crate::core::remote_sync::RemoteSyncClient;
use crate::core::workspace::Workspace;
use crate::domain::{BisyncError, Result};
use crate::log_error_with_context;
use crate::logging::RunLog;
use std::time::Instant;
use tracing::instrument::WithSubscriber;

/// Sync coordinator
pub struct SyncCoordinator {
    params: SyncParameters,
    config: BisyncConfig,
    workspace: Workspace,
    connector: Box<dyn StoreConnector>,
    transport: Box<dyn RemoteTransport>,
    notifier: Box<dyn Notifier>,
}

impl SyncCoordinator {
    /// Create a coordinator backed by PostgreSQL, ssh/rsync and the webhook
    pub fn new(params: SyncParameters, config: BisyncConfig) -> Result<Self> {
        let connector = PostgresConnector::new(&params, &config.database)?;
        let transport = SshTransport::new(&params, &config.remote)?;
        let notifier = WebhookNotifier::new(&params, &config.notifier)?;

        Ok(Self::with_components(
            params,
            config,
            Box::new(connector),
            Box::new(transport),
            Box::new(notifier),
        ))
    }

    /// Create a coordinator from explicit components
    pub fn with_components(
        params: SyncParameters,
        config: BisyncConfig,
        connector: Box<dyn StoreConnector>,
        transport: Box<dyn RemoteTransport>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let workspace = Workspace::new(
            &config.workspace.root_dir,
            &params.client_name,
            &params.org_name,
        );

        Self {
            params,
            config,
            workspace,
            connector,
            transport,
            notifier,
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Execute the run with every event going to `run_log`
    pub async fn run(&self, run_log: &RunLog) -> RunSummary {
        self.run_logged(run_log)
            .with_subscriber(run_log.dispatch())
            .await
    }

    async fn run_logged(&self, run_log: &RunLog) -> RunSummary {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();
        summary.log_path = Some(run_log.path().to_path_buf());
        let mut session: Option<Box<dyn StoreSession>> = None;

        tracing::info!(
            client = %self.params.client_id,
            org = %self.params.org_id,
            "Starting sync run"
        );

        let result = self.execute(&mut session, &mut summary).await;
        if let Err(error) = &result {
            log_error_with_context!(error, "Sync run failed");
            summary.fail(error);
            if let Err(e) = self.workspace.discard() {
                tracing::warn!(error = %e, "Failed to remove the temporary directory");
            }
        }

        summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        let description = run_log.captured_text().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Run log could not be read back");
            match &result {
                Ok(()) => "Sync run finished".to_string(),
                Err(error) => error.to_string(),
            }
        });
        let notification = match result {
            Ok(()) => RunNotification::success(description),
            Err(_) => RunNotification::error(description),
        };

        match self.notifier.notify(&notification).await {
            Ok(()) => summary.notified = true,
            Err(e) => tracing::warn!(error = %e, "Run notification failed"),
        }

        if let Some(session) = session.take() {
            tracing::info!("Closing database connections");
            if let Err(e) = session.close().await {
                tracing::warn!(error = %e, "Failed to close the metadata store session");
            }
        }

        summary
    }

    async fn execute(
        &self,
        session: &mut Option<Box<dyn StoreSession>>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        self.workspace.prepare()?;

        let session = session.insert(self.connector.connect().await?);
        let reports = session
            .load_reports(&self.params.client_id, &self.params.org_id)
            .await?;
        tracing::info!(count = reports.len(), "Loaded query catalog");

        let delimiter = self
            .params
            .delimiter_byte()
            .map_err(BisyncError::Configuration)?;
        let writer = ArtifactWriter::new(
            self.workspace.tmp_dir(),
            delimiter,
            &self.config.export.file_extension,
        );
        let engine = MergeEngine::new(&self.params, &self.config.export, writer);

        for report in &reports {
            let outcome = engine.process(session.as_executor(), report).await?;
            summary.reports.push(outcome);
        }

        let sync_client = RemoteSyncClient::new(&*self.transport, &self.params.remote_path);
        summary.transferred_files = sync_client.sync(&self.workspace).await?;

        Ok(())
    }
}
