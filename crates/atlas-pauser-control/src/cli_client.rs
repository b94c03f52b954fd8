//! `mongocli`-backed client.
//!
//! Runs `mongocli` as a child process with the API keys and target ids in
//! its environment. A non-zero exit is reported as `PauserError::Remote`
//! carrying the HTTP status mongocli printed, so pause conflicts classify
//! the same way they do over HTTP.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use atlas_pauser_core::{PauserError, Project, Result};
use tokio::process::Command;

use crate::client::{AtlasClient, ProjectList};
use crate::config::{Credentials, PRIVATE_KEY_VAR, PUBLIC_KEY_VAR};

/// Client that shells out to `mongocli`.
#[derive(Debug, Clone)]
pub struct CliAtlasClient {
    program: PathBuf,
    credentials: Credentials,
}

impl CliAtlasClient {
    /// Create a client running the given `mongocli` binary.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            program: program.into(),
            credentials,
        }
    }

    /// Get the binary this client runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .env(PUBLIC_KEY_VAR, self.credentials.public_key())
            .env(PRIVATE_KEY_VAR, self.credentials.private_key())
            .env("MCLI_SERVICE", "cloud")
            .kill_on_drop(true);
        command
    }

    async fn run(&self, mut command: Command) -> Result<String> {
        let output = command.output().await.map_err(|e| {
            PauserError::Config(format!("failed to run {}: {e}", self.program.display()))
        })?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        let message = if stderr.is_empty() {
            format!("{} exited with {}", self.program.display(), output.status)
        } else {
            stderr
        };

        Err(PauserError::remote(status_from_stderr(&message), message))
    }
}

/// Extract the HTTP status from a mongocli error line.
///
/// Recognizes `... HTTP 409 (Error code: ...)` and
/// `...: 409 (request "...")`. Other numbers in the message are ignored.
#[must_use]
pub fn status_from_stderr(stderr: &str) -> Option<u16> {
    let tokens: Vec<&str> = stderr.split_whitespace().collect();

    tokens.windows(2).find_map(|pair| match pair {
        [http, code] if *http == "HTTP" => parse_status(code),
        [code, next] if *next == "(request" => parse_status(code),
        _ => None,
    })
}

fn parse_status(token: &str) -> Option<u16> {
    let code: u16 = token.trim_end_matches(':').parse().ok()?;
    (100..=599).contains(&code).then_some(code)
}

#[async_trait]
impl AtlasClient for CliAtlasClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let mut command = self.command();
        command.args(["iam", "projects", "list", "-o=json"]);

        let stdout = self.run(command).await?;
        let list: ProjectList = serde_json::from_str(&stdout)
            .map_err(|e| PauserError::remote(None, format!("failed to parse project list: {e}")))?;

        tracing::debug!(count = list.results.len(), "Listed projects via mongocli");
        Ok(list.results)
    }

    async fn set_paused(&self, project: &Project, cluster: &str, paused: bool) -> Result<String> {
        let verb = if paused { "pause" } else { "start" };

        let mut command = self.command();
        command
            .args(["atlas", "cluster", verb, cluster, "-o=json"])
            .env("MCLI_ORG_ID", project.org_id.as_str())
            .env("MCLI_PROJECT_ID", project.id.as_str());

        tracing::debug!(project_id = %project.id, cluster = %cluster, verb, "Running mongocli");
        self.run(command).await
    }
}
