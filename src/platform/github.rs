//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CreatePullRequest, GITHUB_HOST, IssuePatch, Milestone, Project, PullRequest, Repository,
    ReviewRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Message GitHub uses when the head ref of a new PR can't be found
const INVALID_HEAD_MESSAGE: &str = "Invalid value for \"head\"";

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
}

#[derive(Deserialize)]
struct TeamResponse {
    slug: String,
}

#[derive(Deserialize)]
struct RefResponse {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct PullRequestResponse {
    number: u64,
    html_url: String,
    title: Option<String>,
    base: RefResponse,
    head: RefResponse,
    #[serde(default)]
    requested_reviewers: Option<Vec<UserResponse>>,
    #[serde(default)]
    requested_teams: Option<Vec<TeamResponse>>,
}

#[derive(Deserialize)]
struct RepositoryResponse {
    name: String,
    owner: UserResponse,
}

#[derive(Deserialize)]
struct MilestoneResponse {
    number: u64,
    title: String,
}

impl From<PullRequestResponse> for PullRequest {
    fn from(pr: PullRequestResponse) -> Self {
        Self {
            number: pr.number,
            html_url: pr.html_url,
            base_ref: pr.base.ref_field,
            head_ref: pr.head.ref_field,
            title: pr.title.unwrap_or_default(),
            requested_reviewers: pr
                .requested_reviewers
                .unwrap_or_default()
                .into_iter()
                .map(|u| u.login)
                .collect(),
            requested_teams: pr
                .requested_teams
                .unwrap_or_default()
                .into_iter()
                .map(|t| t.slug)
                .collect(),
        }
    }
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `host` other than github.com is treated as GitHub Enterprise.
    pub fn new(token: &str, host: Option<String>) -> Result<Self> {
        let host = host.unwrap_or_else(|| GITHUB_HOST.to_string());
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if host != GITHUB_HOST {
            let base_url = format!("https://{host}/api/v3");
            builder = builder
                .base_uri(base_url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create a service against an explicit API root
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(base_uri)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self { client })
    }
}

fn repo_route(project: &Project, rest: &str) -> String {
    format!("/repos/{}/{}{rest}", project.owner, project.name)
}

/// Whether a validation failure is about the head ref
fn is_invalid_head(message: &str, errors: &[Value]) -> bool {
    message.contains(INVALID_HEAD_MESSAGE)
        || errors.iter().any(|e| {
            e.get("field").and_then(Value::as_str) == Some("head")
                && e.get("code").and_then(Value::as_str) == Some("invalid")
        })
}

/// Render GitHub's message plus any per-field details
fn describe_github_error(message: &str, errors: &[Value]) -> String {
    let details: Vec<String> = errors
        .iter()
        .filter_map(|e| {
            if let Some(msg) = e.get("message").and_then(Value::as_str) {
                return Some(msg.to_string());
            }
            let field = e.get("field").and_then(Value::as_str)?;
            let code = e.get("code").and_then(Value::as_str).unwrap_or("invalid");
            Some(if code == "invalid" {
                format!("Invalid value for \"{field}\"")
            } else {
                format!("{field}: {code}")
            })
        })
        .collect();

    if details.is_empty() {
        message.to_string()
    } else {
        format!("{message} ({})", details.join(", "))
    }
}

fn classify_create_error(err: octocrab::Error) -> Error {
    if let octocrab::Error::GitHub { source, .. } = &err {
        let errors = source.errors.as_deref().unwrap_or_default();
        let description = describe_github_error(&source.message, errors);
        if is_invalid_head(&source.message, errors) {
            return Error::InvalidHead(description);
        }
        return Error::GitHubApi(description);
    }
    err.into()
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn repository(&self, project: &Project) -> Result<Repository> {
        let repo: RepositoryResponse = self
            .client
            .get(repo_route(project, ""), None::<&()>)
            .await?;

        Ok(Repository {
            owner: repo.owner.login,
            name: repo.name,
        })
    }

    async fn create_pull_request(
        &self,
        project: &Project,
        request: &CreatePullRequest,
    ) -> Result<PullRequest> {
        debug!(
            project = %project,
            head = %request.head,
            base = %request.base,
            "creating pull request"
        );

        let pr: PullRequestResponse = self
            .client
            .post(repo_route(project, "/pulls"), Some(request))
            .await
            .map_err(classify_create_error)?;

        Ok(pr.into())
    }

    async fn update_issue(
        &self,
        project: &Project,
        number: u64,
        patch: &IssuePatch,
    ) -> Result<()> {
        let _: Value = self
            .client
            .patch(repo_route(project, &format!("/issues/{number}")), Some(patch))
            .await?;
        Ok(())
    }

    async fn list_milestones(&self, project: &Project) -> Result<Vec<Milestone>> {
        let milestones: Vec<MilestoneResponse> = self
            .client
            .get(repo_route(project, "/milestones?per_page=100"), None::<&()>)
            .await?;

        Ok(milestones
            .into_iter()
            .map(|m| Milestone {
                number: m.number,
                title: m.title,
            })
            .collect())
    }

    async fn request_reviewers(
        &self,
        project: &Project,
        number: u64,
        request: &ReviewRequest,
    ) -> Result<()> {
        let _: Value = self
            .client
            .post(
                repo_route(project, &format!("/pulls/{number}/requested_reviewers")),
                Some(request),
            )
            .await?;
        Ok(())
    }
}
