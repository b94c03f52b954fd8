//! Error types for atlas-pauser.
//!
//! Every failure carries one of three kinds (see [`ErrorKind`]): bad input,
//! a rejected remote operation, or a deployment misconfiguration. The entry
//! point reports failures as `<kind>: <message>`.

use std::fmt;

use thiserror::Error;

/// A result type using `PauserError`.
pub type Result<T> = std::result::Result<T, PauserError>;

/// Classification of a [`PauserError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input event, or a project name that does not resolve to
    /// exactly one project.
    Event,
    /// The remote operation was attempted and rejected or failed.
    Action,
    /// Required configuration is missing or invalid.
    Environment,
}

impl ErrorKind {
    /// Returns the name used when reporting the error.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "EventError",
            Self::Action => "ActionError",
            Self::Environment => "EnvironmentError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while handling a pause/resume event.
#[derive(Debug, Error)]
pub enum PauserError {
    /// The event has no `data` field, or it is empty.
    #[error("no data key in event: {0}")]
    MissingData(String),

    /// The `data` field is not base64-encoded JSON.
    #[error("invalid event data: {0}")]
    InvalidData(String),

    /// A required key is absent from the decoded payload.
    #[error("'{0}': missing key from event data")]
    MissingKey(&'static str),

    /// A required key is present but its value is unusable.
    #[error("'{key}': {reason}")]
    InvalidField {
        /// The offending key.
        key: &'static str,
        /// What is wrong with the value.
        reason: &'static str,
    },

    /// The action is not one of `start`, `pause` or `unpause`.
    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    /// No project carries the requested name.
    #[error("no result found for project name: {0}")]
    ProjectNotFound(String),

    /// More than one project carries the requested name.
    #[error("multiple results found for project name: {name} ({count} matches)")]
    AmbiguousProject {
        /// The requested project name.
        name: String,
        /// How many projects matched.
        count: usize,
    },

    /// The pause request was answered with 409 Conflict.
    #[error("cannot pause cluster {cluster}: is cluster already paused? ({message})")]
    AlreadyPaused {
        /// The cluster that was targeted.
        cluster: String,
        /// The remote error message.
        message: String,
    },

    /// The pause request was answered with 400 Bad Request.
    #[error(
        "cannot pause cluster {cluster}: already paused within the last 60 minutes? ({message})"
    )]
    PauseCooldown {
        /// The cluster that was targeted.
        cluster: String,
        /// The remote error message.
        message: String,
    },

    /// A remote call failed for any other reason.
    #[error("remote request failed: {message}")]
    Remote {
        /// HTTP status reported by the remote, if one is known.
        status: Option<u16>,
        /// Human-readable description of the failure.
        message: String,
    },

    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    /// A configuration value is invalid or the configured tooling is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PauserError {
    /// Create a remote failure.
    #[must_use]
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingData(_)
            | Self::InvalidData(_)
            | Self::MissingKey(_)
            | Self::InvalidField { .. }
            | Self::UnknownAction(_)
            | Self::ProjectNotFound(_)
            | Self::AmbiguousProject { .. } => ErrorKind::Event,
            Self::AlreadyPaused { .. } | Self::PauseCooldown { .. } | Self::Remote { .. } => {
                ErrorKind::Action
            }
            Self::MissingEnv(_) | Self::Config(_) => ErrorKind::Environment,
        }
    }

    /// Returns true if a pause was rejected because the cluster cannot be
    /// paused again yet.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyPaused { .. } | Self::PauseCooldown { .. })
    }

    /// Returns the remote HTTP status behind this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => *status,
            Self::AlreadyPaused { .. } => Some(409),
            Self::PauseCooldown { .. } => Some(400),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(
            PauserError::MissingData("{}".to_string()).kind(),
            ErrorKind::Event
        );
        assert_eq!(
            PauserError::UnknownAction("stop".to_string()).kind(),
            ErrorKind::Event
        );
        assert_eq!(
            PauserError::AmbiguousProject {
                name: "dev".to_string(),
                count: 2
            }
            .kind(),
            ErrorKind::Event
        );
        assert_eq!(
            PauserError::remote(Some(500), "boom").kind(),
            ErrorKind::Action
        );
        assert_eq!(
            PauserError::MissingEnv("MCLI_PUBLIC_API_KEY").kind(),
            ErrorKind::Environment
        );
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::Event.to_string(), "EventError");
        assert_eq!(ErrorKind::Action.to_string(), "ActionError");
        assert_eq!(ErrorKind::Environment.to_string(), "EnvironmentError");
    }

    #[test]
    fn conflict_classification() {
        let paused = PauserError::AlreadyPaused {
            cluster: "cluster0".to_string(),
            message: "CANNOT_UPDATE_PAUSED_CLUSTER".to_string(),
        };
        let cooldown = PauserError::PauseCooldown {
            cluster: "cluster0".to_string(),
            message: "CANNOT_PAUSE_RECENTLY_RESUMED_CLUSTER".to_string(),
        };

        assert!(paused.is_conflict());
        assert!(cooldown.is_conflict());
        assert!(!PauserError::remote(Some(409), "conflict").is_conflict());
        assert_eq!(paused.status(), Some(409));
        assert_eq!(cooldown.status(), Some(400));
        assert!(paused.to_string().contains("already paused"));
        assert!(cooldown.to_string().contains("last 60 minutes"));
    }

    #[test]
    fn missing_key_names_key() {
        let err = PauserError::MissingKey("cluster");
        assert_eq!(err.to_string(), "'cluster': missing key from event data");
    }
}
