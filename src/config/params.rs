//! Invocation parameters
//!
//! A run is driven by a single comma-separated positional argument. This
//! module splits it into named fields, applies the caller's normalization
//! rules and validates what can be validated before anything touches the
//! network.

use crate::config::secret::{secret_string, SecretString};
use crate::domain::{BisyncError, Result};
use secrecy::ExposeSecret;
use url::Url;

/// Field names, in positional order
pub const FIELD_NAMES: [&str; 18] = [
    "database_name",
    "database_host",
    "database_port",
    "client_id",
    "org_id",
    "webhook_name",
    "webhook_key",
    "org_name",
    "delimiter",
    "client_name",
    "remote_user",
    "remote_host",
    "remote_port",
    "remote_path",
    "database_user",
    "database_password",
    "private_key_path",
    "webhook_url",
];

const DEFAULT_REMOTE_PORT: &str = "22";

/// Named values parsed from the positional argument list
#[derive(Debug, Clone)]
pub struct SyncParameters {
    pub database_name: String,
    pub database_host: String,
    pub database_port: String,
    /// Requesting client (tenant) id
    pub client_id: String,
    /// Requesting organization id
    pub org_id: String,
    pub webhook_name: String,
    pub webhook_key: SecretString,
    /// Organization display name, used for directory names
    pub org_name: String,
    /// CSV field delimiter
    pub delimiter: String,
    /// Client display name, used for directory names and the artifact prefix
    pub client_name: String,
    pub remote_user: String,
    pub remote_host: String,
    pub remote_port: String,
    /// Remote base path, always ending with `/`
    pub remote_path: String,
    pub database_user: String,
    pub database_password: SecretString,
    /// Private key for the secure shell, `None` when empty
    pub private_key_path: Option<String>,
    /// Base URL the webhook path is appended to
    pub webhook_url: String,
}

impl SyncParameters {
    /// Parse the comma-separated argument string
    ///
    /// Fields beyond the eighteenth are ignored. Missing fields are an error.
    ///
    /// # Example
    ///
    /// ```
    /// use bisync::config::SyncParameters;
    ///
    /// let raw = "bi,db.local,5432,C1,O1,hook,key,Main Org,;,Acme,bi,sftp.local,,/data,ro,pw,,https://erp.local";
    /// let params = SyncParameters::parse(raw).unwrap();
    /// assert_eq!(params.remote_port, "22");
    /// assert_eq!(params.remote_path, "/data/");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let fields: Vec<&str> = raw.split(',').collect();
        if fields.len() < FIELD_NAMES.len() {
            return Err(BisyncError::Configuration(format!(
                "expected {} comma-separated parameters, got {} (missing '{}')",
                FIELD_NAMES.len(),
                fields.len(),
                FIELD_NAMES[fields.len()]
            )));
        }

        let field = |i: usize| fields[i].to_string();

        let remote_port = if fields[12].trim().is_empty() {
            DEFAULT_REMOTE_PORT.to_string()
        } else {
            field(12)
        };

        let mut remote_path = field(13);
        if !remote_path.ends_with('/') {
            remote_path.push('/');
        }

        let private_key_path = Some(field(16)).filter(|p| !p.trim().is_empty());

        Ok(Self {
            database_name: field(0),
            database_host: field(1),
            database_port: field(2),
            client_id: field(3),
            org_id: field(4),
            webhook_name: field(5),
            webhook_key: secret_string(field(6)),
            org_name: field(7),
            delimiter: field(8),
            client_name: field(9),
            remote_user: field(10),
            remote_host: field(11),
            remote_port,
            remote_path,
            database_user: field(14),
            database_password: secret_string(field(15)),
            private_key_path,
            webhook_url: field(17),
        })
    }

    /// Validates the parameters
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid parameter.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (name, value) in [
            ("client_id", &self.client_id),
            ("org_id", &self.org_id),
            ("database_name", &self.database_name),
            ("database_host", &self.database_host),
            ("remote_user", &self.remote_user),
            ("remote_host", &self.remote_host),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{name} cannot be empty"));
            }
        }

        self.delimiter_byte()?;

        self.database_port_number()
            .map_err(|_| format!("Invalid database_port '{}'", self.database_port))?;
        self.remote_port_number()
            .map_err(|_| format!("Invalid remote_port '{}'", self.remote_port))?;

        let url = Url::parse(&self.webhook_url)
            .map_err(|e| format!("Invalid webhook_url '{}': {e}", self.webhook_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("webhook_url must start with http:// or https://".to_string());
        }

        if self.webhook_key.expose_secret().is_empty() {
            tracing::warn!("webhook_key is empty, notifications will likely be rejected");
        }

        Ok(())
    }

    /// The delimiter as the single byte a CSV writer needs
    pub fn delimiter_byte(&self) -> std::result::Result<u8, String> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            (Some(_), None) => Err(format!(
                "delimiter '{}' must be an ASCII character",
                self.delimiter
            )),
            _ => Err(format!(
                "delimiter must be exactly one character, got '{}'",
                self.delimiter
            )),
        }
    }

    pub fn database_port_number(&self) -> std::result::Result<u16, std::num::ParseIntError> {
        self.database_port.trim().parse()
    }

    pub fn remote_port_number(&self) -> std::result::Result<u16, std::num::ParseIntError> {
        self.remote_port.trim().parse()
    }

    /// Endpoint the notification is sent to
    pub fn webhook_endpoint(&self) -> String {
        format!("{}/webhooks/", self.webhook_url.trim_end_matches('/'))
    }

    /// Tag prepended to tenant-authored artifacts: first three characters of
    /// the client display name, then `_`
    pub fn client_prefix(&self) -> String {
        let tag: String = self.client_name.chars().take(3).collect();
        format!("{tag}_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "bi,db.local,5432,C1,O1,hook,key,Main & Co,;,Acme Corp,bi,sftp.local,2222,/srv/bi,ro,pw,/home/bi/.ssh/id,https://erp.local/etendo";

    #[test]
    fn test_parse_positional_fields() {
        let params = SyncParameters::parse(RAW).unwrap();
        assert_eq!(params.database_name, "bi");
        assert_eq!(params.client_id, "C1");
        assert_eq!(params.org_name, "Main & Co");
        assert_eq!(params.delimiter, ";");
        assert_eq!(params.remote_port, "2222");
        assert_eq!(params.remote_path, "/srv/bi/");
        assert_eq!(params.private_key_path.as_deref(), Some("/home/bi/.ssh/id"));
        assert_eq!(params.webhook_url, "https://erp.local/etendo");
        assert_eq!(params.database_password.expose_secret(), "pw");
    }

    #[test]
    fn test_parse_missing_fields() {
        let err = SyncParameters::parse("bi,db.local,5432").unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn test_parse_ignores_trailing_fields() {
        let raw = format!("{RAW},");
        assert!(SyncParameters::parse(&raw).is_ok());
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let params = SyncParameters::parse(RAW).unwrap();
        let debug = format!("{params:?}");
        assert!(!debug.contains(",pw,"));
        assert!(!debug.contains("\"pw\""));
        assert!(!debug.contains("\"key\""));
    }

    #[test]
    fn test_validate_ok() {
        let params = SyncParameters::parse(RAW).unwrap();
        assert!(params.validate().is_ok());
        assert_eq!(params.delimiter_byte().unwrap(), b';');
    }

    #[test]
    fn test_validate_rejects_multi_char_delimiter() {
        let mut params = SyncParameters::parse(RAW).unwrap();
        params.delimiter = "||".to_string();
        assert!(params.validate().is_err());
        params.delimiter = String::new();
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_port() {
        let mut params = SyncParameters::parse(RAW).unwrap();
        params.database_port = "five".to_string();
        assert!(params.validate().unwrap_err().contains("database_port"));
    }

    #[test]
    fn test_webhook_endpoint() {
        let mut params = SyncParameters::parse(RAW).unwrap();
        assert_eq!(params.webhook_endpoint(), "https://erp.local/etendo/webhooks/");
        params.webhook_url = "https://erp.local/".to_string();
        assert_eq!(params.webhook_endpoint(), "https://erp.local/webhooks/");
    }

    #[test]
    fn test_client_prefix() {
        let params = SyncParameters::parse(RAW).unwrap();
        assert_eq!(params.client_prefix(), "Acm_");
    }
}
