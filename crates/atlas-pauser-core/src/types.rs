//! Command and project types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PauserError;
use crate::ids::{OrgId, ProjectId};

/// A lifecycle transition requested by an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Resume a paused cluster.
    Start,
    /// Pause a running cluster.
    Pause,
    /// Alias of [`Action::Start`].
    Unpause,
}

impl Action {
    /// The `paused` value this action sets on the cluster.
    #[must_use]
    pub const fn paused(self) -> bool {
        matches!(self, Self::Pause)
    }

    /// Returns the action as it appears in event payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PauserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "unpause" => Ok(Self::Unpause),
            other => Err(PauserError::UnknownAction(other.to_string())),
        }
    }
}

/// A validated pause/resume command for one project/cluster pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// The requested transition.
    pub action: Action,
    /// Display name of the project owning the cluster.
    pub project_name: String,
    /// Name of the cluster within the project.
    pub cluster: String,
}

impl Command {
    /// Create a new command.
    #[must_use]
    pub fn new(action: Action, project_name: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            action,
            project_name: project_name.into(),
            cluster: cluster.into(),
        }
    }
}

/// A project as listed by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Display name.
    pub name: String,
    /// Owning organization.
    pub org_id: OrgId,
    /// Project id.
    pub id: ProjectId,
}

impl Project {
    /// Create a new project record.
    #[must_use]
    pub fn new(name: impl Into<String>, org_id: impl Into<OrgId>, id: impl Into<ProjectId>) -> Self {
        Self {
            name: name.into(),
            org_id: org_id.into(),
            id: id.into(),
        }
    }
}
