//! Action dispatch and outcome classification.
//!
//! The dispatcher resolves the target project, issues the pause-state
//! update and turns remote failures into the error taxonomy:
//!
//! | Action | Remote answer | Result |
//! |---|---|---|
//! | any | 2xx | success, response body |
//! | `pause` | 409 | `PauserError::AlreadyPaused` |
//! | `pause` | 400 | `PauserError::PauseCooldown` |
//! | any | other failure | `PauserError::Remote` |
//!
//! `start` and `unpause` are idempotent: a 2xx on a running cluster is a
//! success.

use std::sync::Arc;

use atlas_pauser_core::{Action, Command, Event, PauserError, Project, Result};

use crate::client::AtlasClient;
use crate::resolver::resolve_project;

/// A successfully applied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The action that was applied.
    pub action: Action,
    /// The project owning the cluster.
    pub project: Project,
    /// The cluster that was updated.
    pub cluster: String,
    /// Response body returned by the control plane.
    pub body: String,
}

/// Executes pause/resume commands against a control-plane client.
pub struct ClusterPauser {
    client: Arc<dyn AtlasClient>,
}

impl ClusterPauser {
    /// Create a dispatcher using the given client.
    #[must_use]
    pub fn new(client: Arc<dyn AtlasClient>) -> Self {
        Self { client }
    }

    /// Decode an event and execute the command it carries.
    ///
    /// # Errors
    ///
    /// Returns decoding errors before any remote call is made, then any
    /// error from [`ClusterPauser::dispatch`].
    pub async fn handle_event(&self, event: &Event) -> Result<Outcome> {
        let command = event.decode()?;
        self.dispatch(&command).await
    }

    /// Execute a validated command.
    ///
    /// # Errors
    ///
    /// Returns project resolution errors unchanged, and a classified
    /// `ActionError` kind if the update is rejected.
    pub async fn dispatch(&self, command: &Command) -> Result<Outcome> {
        tracing::info!(
            action = %command.action,
            project_name = %command.project_name,
            cluster = %command.cluster,
            "Dispatching command"
        );

        let project = resolve_project(self.client.as_ref(), &command.project_name).await?;

        let body = self
            .client
            .set_paused(&project, &command.cluster, command.action.paused())
            .await
            .map_err(|error| classify(command.action, &command.cluster, error))?;

        tracing::info!(
            action = %command.action,
            project_id = %project.id,
            cluster = %command.cluster,
            "Command applied"
        );

        Ok(Outcome {
            action: command.action,
            project,
            cluster: command.cluster.clone(),
            body,
        })
    }
}

/// Map a failed pause-state update onto the error taxonomy.
#[must_use]
pub fn classify(action: Action, cluster: &str, error: PauserError) -> PauserError {
    let classified = match (action, error) {
        (
            Action::Pause,
            PauserError::Remote {
                status: Some(409),
                message,
            },
        ) => PauserError::AlreadyPaused {
            cluster: cluster.to_string(),
            message,
        },
        (
            Action::Pause,
            PauserError::Remote {
                status: Some(400),
                message,
            },
        ) => PauserError::PauseCooldown {
            cluster: cluster.to_string(),
            message,
        },
        (_, error) => error,
    };

    tracing::warn!(
        action = %action,
        cluster = %cluster,
        kind = %classified.kind(),
        error = %classified,
        "Command rejected"
    );
    classified
}
