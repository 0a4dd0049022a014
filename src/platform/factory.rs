//! Platform service factory
//!
//! Creates the hosting service client for a project's host.

use crate::auth::get_github_auth;
use crate::error::Result;
use crate::platform::{GitHubService, PlatformService};
use crate::types::Project;
use tracing::debug;

/// Create a platform service for the host of `project`
///
/// Handles authentication and client construction.
pub async fn create_platform_service(project: &Project) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth(&project.host).await?;
    debug!(host = %project.host, source = ?auth.source, "authenticated");

    Ok(Box::new(GitHubService::new(
        &auth.token,
        Some(project.host.clone()),
    )?))
}
