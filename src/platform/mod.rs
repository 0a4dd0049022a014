//! Hosting service access
//!
//! Provides the interface the submission workflow uses to talk to GitHub.

mod detection;
mod factory;
mod github;

pub use detection::{is_supported_host, parse_remote_url};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CreatePullRequest, IssuePatch, Milestone, Project, PullRequest, Repository, ReviewRequest,
};
use async_trait::async_trait;

/// Platform service trait for pull request operations
///
/// Every operation takes the project it acts on, since base and head may
/// live in different repositories (forks).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Fetch the canonical owner/name of a repository
    async fn repository(&self, project: &Project) -> Result<Repository>;

    /// Create a pull request in `project`
    ///
    /// Must return [`Error::InvalidHead`](crate::Error::InvalidHead) when the
    /// service rejects the head ref, so callers can tell the push/visibility
    /// race apart from other failures.
    async fn create_pull_request(
        &self,
        project: &Project,
        request: &CreatePullRequest,
    ) -> Result<PullRequest>;

    /// Update labels, assignees and milestone of issue/PR `number`
    async fn update_issue(&self, project: &Project, number: u64, patch: &IssuePatch)
    -> Result<()>;

    /// List milestones of a project
    async fn list_milestones(&self, project: &Project) -> Result<Vec<Milestone>>;

    /// Request reviews from users and teams on PR `number`
    async fn request_reviewers(
        &self,
        project: &Project,
        number: u64,
        request: &ReviewRequest,
    ) -> Result<()>;
}
