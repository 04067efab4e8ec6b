//! Webhook run notifier
//!
//! Every run ends with one GET request to `<webhook_url>/webhooks/` carrying
//! the run outcome and the captured log text as query parameters.

use crate::config::{NotifierConfig, SecretString, SyncParameters};
use crate::domain::{BisyncError, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome reported for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Success,
    Error,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Success => "Success",
            LogType::Error => "Error",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The message sent at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunNotification {
    pub log_type: LogType,
    /// Captured run log text
    pub description: String,
}

impl RunNotification {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            log_type: LogType::Success,
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            log_type: LogType::Error,
            description: description.into(),
        }
    }
}

/// Delivers run notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification
    ///
    /// # Errors
    ///
    /// Returns `Notification` if the request fails or is rejected. Callers
    /// log the failure; it never changes the run outcome.
    async fn notify(&self, notification: &RunNotification) -> Result<()>;
}

/// Notifier calling the ERP webhook endpoint
pub struct WebhookNotifier {
    endpoint: String,
    name: String,
    api_key: SecretString,
    /// Organization id, not its display name
    organization: String,
    rule: String,
    http_client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier for the run parameters
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(params: &SyncParameters, config: &NotifierConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                BisyncError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            endpoint: params.webhook_endpoint(),
            name: params.webhook_name.clone(),
            api_key: params.webhook_key.clone(),
            organization: params.org_id.clone(),
            rule: config.rule_id.clone(),
            http_client,
        })
    }

    /// Endpoint notifications are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &RunNotification) -> Result<()> {
        debug!(
            endpoint = %self.endpoint,
            log_type = %notification.log_type,
            "Sending run notification"
        );

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[
                ("name", self.name.as_str()),
                ("apikey", self.api_key.expose_secret().as_str()),
                ("description", notification.description.as_str()),
                ("organization", self.organization.as_str()),
                ("logtype", notification.log_type.as_str()),
                ("rule", self.rule.as_str()),
            ])
            .send()
            .await
            .map_err(|e| BisyncError::Notification(format!("Failed to send notification: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            info!(status = %status, log_type = %notification.log_type, "Run notification sent");
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = %status, body = %body, "Webhook rejected the run notification");
            Err(BisyncError::Notification(format!(
                "Webhook returned status {}: {}",
                status, body
            )))
        }
    }
}
