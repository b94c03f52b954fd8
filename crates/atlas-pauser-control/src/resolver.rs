//! Project name resolution.

use atlas_pauser_core::{PauserError, Project, Result};

use crate::client::AtlasClient;

/// Resolve a project name to the single project carrying it.
///
/// # Errors
///
/// Returns `PauserError::ProjectNotFound` or `PauserError::AmbiguousProject`
/// if the name does not match exactly one project, and propagates any error
/// from listing projects.
pub async fn resolve_project(client: &dyn AtlasClient, name: &str) -> Result<Project> {
    let projects = client.list_projects().await?;
    let project = select_project(projects, name)?;

    tracing::debug!(
        project_name = %name,
        project_id = %project.id,
        org_id = %project.org_id,
        "Resolved project"
    );
    Ok(project)
}

/// Pick the project whose name equals `name` exactly.
///
/// # Errors
///
/// See [`resolve_project`].
pub fn select_project(projects: Vec<Project>, name: &str) -> Result<Project> {
    let mut matches: Vec<Project> = projects.into_iter().filter(|p| p.name == name).collect();

    match matches.len() {
        0 => Err(PauserError::ProjectNotFound(name.to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(PauserError::AmbiguousProject {
            name: name.to_string(),
            count,
        }),
    }
}
