//! Core types for prflow

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default GitHub host
pub const GITHUB_HOST: &str = "github.com";

/// A remote repository: (host, owner, name)
///
/// Equality ignores ASCII case, matching how GitHub resolves names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Host (e.g. "github.com")
    pub host: String,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl Project {
    /// Create a new project
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Qualify a ref with this project's owner (`owner:ref`)
    pub fn qualify(&self, git_ref: &str) -> String {
        format!("{}:{git_ref}", self.owner)
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.host.eq_ignore_ascii_case(&other.host)
            && self.owner.eq_ignore_ascii_case(&other.owner)
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for Project {}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A git branch, local or remote-tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name without `refs/heads/` or `<remote>/`
    pub short_name: String,
    /// Remote name for remote-tracking branches
    pub remote: Option<String>,
}

impl Branch {
    /// A local branch
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            short_name: name.into(),
            remote: None,
        }
    }

    /// A remote-tracking branch
    pub fn remote(remote: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            short_name: name.into(),
            remote: Some(remote.into()),
        }
    }

    /// Whether this is a remote-tracking branch
    pub const fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Fully qualified ref name
    pub fn long_name(&self) -> String {
        match &self.remote {
            Some(remote) => format!("refs/remotes/{remote}/{}", self.short_name),
            None => format!("refs/heads/{}", self.short_name),
        }
    }
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Canonical repository identity as reported by the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owner login
    pub owner: String,
    /// Repository name
    pub name: String,
}

/// A created pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
    /// Logins already requested for review
    pub requested_reviewers: Vec<String>,
    /// Team slugs already requested for review
    pub requested_teams: Vec<String>,
}

impl PullRequest {
    /// Whether a review was already requested from `login`
    pub fn has_requested_reviewer(&self, login: &str) -> bool {
        self.requested_reviewers
            .iter()
            .any(|r| r.eq_ignore_ascii_case(login))
    }

    /// Whether a review was already requested from team `slug`
    pub fn has_requested_team(&self, slug: &str) -> bool {
        self.requested_teams
            .iter()
            .any(|t| t.eq_ignore_ascii_case(slug))
    }
}

/// A project milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone number
    pub number: u64,
    /// Milestone title
    pub title: String,
}

/// A pull request that has not been submitted yet
#[derive(Debug, Clone)]
pub struct PullRequestDraft {
    /// Project the PR targets
    pub base_project: Project,
    /// Branch to merge into
    pub base_ref: String,
    /// Project holding the head branch
    pub head_project: Project,
    /// Branch to merge from
    pub head_ref: String,
    /// Title (empty when converting an issue)
    pub title: String,
    /// Description
    pub body: String,
    /// Open as draft
    pub draft: bool,
    /// Issue to convert instead of supplying a title
    pub issue: Option<u64>,
}

impl PullRequestDraft {
    /// `owner:ref` form of the head, as the API expects it
    pub fn qualified_head(&self) -> String {
        self.head_project.qualify(&self.head_ref)
    }

    /// `owner:ref` form of the base
    pub fn qualified_base(&self) -> String {
        self.base_project.qualify(&self.base_ref)
    }

    /// Build the create payload for this draft
    pub fn to_request(&self) -> CreatePullRequest {
        let (title, body, issue) = if self.title.is_empty() {
            (None, None, self.issue)
        } else {
            let body = (!self.body.is_empty()).then(|| self.body.clone());
            (Some(self.title.clone()), body, None)
        };

        CreatePullRequest {
            base: self.base_ref.clone(),
            head: self.qualified_head(),
            title,
            body,
            issue,
            draft: self.draft,
        }
    }
}

/// Payload for creating a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePullRequest {
    /// Base branch name
    pub base: String,
    /// Head as `owner:ref`
    pub head: String,
    /// Title; absent when converting an issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Issue number to convert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<u64>,
    /// Open as draft
    pub draft: bool,
}

/// Payload for updating issue metadata on a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssuePatch {
    /// Labels to set
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Assignee logins
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<String>,
    /// Milestone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

impl IssuePatch {
    /// Whether the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.assignees.is_empty() && self.milestone.is_none()
    }
}

/// Payload for requesting reviews
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    /// User logins
    pub reviewers: Vec<String>,
    /// Team slugs
    pub team_reviewers: Vec<String>,
}

impl ReviewRequest {
    /// Whether there is anyone to request
    pub fn is_empty(&self) -> bool {
        self.reviewers.is_empty() && self.team_reviewers.is_empty()
    }
}
