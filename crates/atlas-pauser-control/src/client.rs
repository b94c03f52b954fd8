//! The control-plane client interface.
//!
//! [`AtlasClient`] is the single seam between the dispatcher and the remote
//! API. Two implementations exist: [`HttpAtlasClient`](crate::HttpAtlasClient)
//! talks to the admin API directly and [`CliAtlasClient`](crate::CliAtlasClient)
//! shells out to `mongocli`. Both report remote failures as
//! `PauserError::Remote` carrying the HTTP status where one is known, so the
//! dispatcher classifies them identically.

use async_trait::async_trait;
use atlas_pauser_core::{Project, Result};
use serde::Deserialize;

/// Trait for control-plane communication.
#[async_trait]
pub trait AtlasClient: Send + Sync {
    /// List every project visible to the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::Remote` if the request fails or the response
    /// cannot be parsed.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Set the `paused` flag of a cluster, returning the response body.
    ///
    /// # Errors
    ///
    /// Returns `PauserError::Remote` with the HTTP status if the remote
    /// rejects the update.
    async fn set_paused(&self, project: &Project, cluster: &str, paused: bool) -> Result<String>;
}

/// Project collection as returned by `GET /groups`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectList {
    #[serde(default)]
    pub results: Vec<Project>,
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockAtlasClient, PauseCall};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use async_trait::async_trait;
    use atlas_pauser_core::{PauserError, Project, Result};
    use parking_lot::Mutex;

    use super::AtlasClient;

    /// A recorded `set_paused` call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PauseCall {
        /// Project id passed to the call.
        pub project_id: String,
        /// Cluster passed to the call.
        pub cluster: String,
        /// Requested `paused` value.
        pub paused: bool,
    }

    /// In-memory client returning canned responses and recording calls.
    #[derive(Debug, Default)]
    pub struct MockAtlasClient {
        projects: Vec<Project>,
        pause_status: Option<u16>,
        list_calls: Mutex<usize>,
        pause_calls: Mutex<Vec<PauseCall>>,
    }

    impl MockAtlasClient {
        /// Create a client listing the given projects and accepting every update.
        #[must_use]
        pub fn new(projects: Vec<Project>) -> Self {
            Self {
                projects,
                ..Self::default()
            }
        }

        /// Make every `set_paused` call fail with the given HTTP status.
        #[must_use]
        pub fn failing_with(mut self, status: u16) -> Self {
            self.pause_status = Some(status);
            self
        }

        /// Number of `list_projects` calls made.
        #[must_use]
        pub fn list_calls(&self) -> usize {
            *self.list_calls.lock()
        }

        /// Recorded `set_paused` calls.
        #[must_use]
        pub fn pause_calls(&self) -> Vec<PauseCall> {
            self.pause_calls.lock().clone()
        }
    }

    #[async_trait]
    impl AtlasClient for MockAtlasClient {
        async fn list_projects(&self) -> Result<Vec<Project>> {
            *self.list_calls.lock() += 1;
            Ok(self.projects.clone())
        }

        async fn set_paused(
            &self,
            project: &Project,
            cluster: &str,
            paused: bool,
        ) -> Result<String> {
            self.pause_calls.lock().push(PauseCall {
                project_id: project.id.to_string(),
                cluster: cluster.to_string(),
                paused,
            });

            match self.pause_status {
                Some(status) => Err(PauserError::remote(
                    Some(status),
                    format!("HTTP {status}"),
                )),
                None => Ok(format!(r#"{{"name":"{cluster}","paused":{paused}}}"#)),
            }
        }
    }
}
