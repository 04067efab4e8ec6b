//! ssh and rsync backed transport
//!
//! Programs are spawned directly with argument vectors, never through a local
//! shell. Paths inside remote commands are single-quoted for the remote shell.

use super::traits::RemoteTransport;
use crate::config::{RemoteConfig, SyncParameters};
use crate::domain::{BisyncError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Transport reaching the host over ssh and mirroring with rsync
#[derive(Debug, Clone)]
pub struct SshTransport {
    ssh_program: String,
    rsync_program: String,
    user: String,
    host: String,
    port: u16,
    private_key: Option<String>,
}

impl SshTransport {
    /// Build a transport from the run parameters
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the remote port is not a valid port number.
    pub fn new(params: &SyncParameters, config: &RemoteConfig) -> Result<Self> {
        let port = params.remote_port_number().map_err(|e| {
            BisyncError::Configuration(format!(
                "Invalid remote port '{}': {e}",
                params.remote_port
            ))
        })?;

        Ok(Self {
            ssh_program: config.ssh_program.clone(),
            rsync_program: config.rsync_program.clone(),
            user: params.remote_user.clone(),
            host: params.remote_host.clone(),
            port,
            private_key: params.private_key_path.clone(),
        })
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// Arguments for running `remote_command` on the host
    pub fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(key) = &self.private_key {
            args.push("-i".to_string());
            args.push(key.clone());
        }
        args.extend([
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-p".to_string(),
            self.port.to_string(),
            self.destination(),
            remote_command.to_string(),
        ]);
        args
    }

    /// The `-e` value rsync uses to reach the host
    pub fn remote_shell(&self) -> String {
        let mut shell = format!("ssh -p {}", self.port);
        if let Some(key) = &self.private_key {
            shell.push_str(&format!(" -i {}", remote_quote(key)));
        }
        shell.push_str(" -o StrictHostKeyChecking=no -o BatchMode=yes");
        shell
    }

    /// Arguments for mirroring `local_dir` into `remote_dir`
    pub fn rsync_args(&self, local_dir: &Path, remote_dir: &str, delete_extraneous: bool) -> Vec<String> {
        let mut args = vec!["-av".to_string()];
        if delete_extraneous {
            args.push("--delete".to_string());
        }
        args.push("-e".to_string());
        args.push(self.remote_shell());
        args.push(format!("{}/", local_dir.display()));
        args.push(format!(
            "{}:{}/",
            self.destination(),
            remote_dir.trim_end_matches('/')
        ));
        args
    }

    async fn run_remote(&self, remote_command: &str) -> std::io::Result<Output> {
        tracing::debug!(host = %self.host, command = remote_command, "Running remote command");
        Command::new(&self.ssh_program)
            .args(self.ssh_args(remote_command))
            .stdin(Stdio::null())
            .output()
            .await
    }
}

#[async_trait]
impl RemoteTransport for SshTransport {
    async fn probe(&self) -> Result<()> {
        let output = self.run_remote("echo 1").await.map_err(|e| {
            BisyncError::RemoteUnreachable(format!("Failed to run {}: {e}", self.ssh_program))
        })?;

        if answered_one(&output) {
            Ok(())
        } else {
            Err(BisyncError::RemoteUnreachable(format!(
                "{} did not answer: {}",
                self.destination(),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn path_exists(&self, path: &str) -> Result<bool> {
        let command = format!("test -d {} && echo 1", remote_quote(path));
        let output = self.run_remote(&command).await.map_err(|e| {
            BisyncError::RemoteUnreachable(format!("Failed to run {}: {e}", self.ssh_program))
        })?;

        Ok(answered_one(&output))
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        let command = format!("mkdir -p {}", remote_quote(path));
        let output = self.run_remote(&command).await.map_err(|e| {
            BisyncError::Transfer(format!("Failed to run {}: {e}", self.ssh_program))
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BisyncError::Transfer(format!(
                "Failed to create remote directory {path}: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    async fn mirror(
        &self,
        local_dir: &Path,
        remote_dir: &str,
        delete_extraneous: bool,
        transfer_log: &Path,
    ) -> Result<()> {
        let args = self.rsync_args(local_dir, remote_dir, delete_extraneous);
        tracing::info!(
            source = %local_dir.display(),
            destination = remote_dir,
            delete = delete_extraneous,
            "Mirroring artifacts"
        );

        let output = Command::new(&self.rsync_program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                BisyncError::Transfer(format!("Failed to run {}: {e}", self.rsync_program))
            })?;

        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(transfer_log)
            .await?;
        log.write_all(&output.stdout).await?;
        log.write_all(&output.stderr).await?;
        log.flush().await?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BisyncError::Transfer(format!(
                "{} exited with {}, see {}",
                self.rsync_program,
                output.status,
                transfer_log.display()
            )))
        }
    }
}

/// Quote a value for the remote shell
pub fn remote_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn answered_one(output: &Output) -> bool {
    output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "1"
}
