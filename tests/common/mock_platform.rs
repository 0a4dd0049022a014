//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use prflow::error::{Error, Result};
use prflow::platform::PlatformService;
use prflow::types::{
    CreatePullRequest, IssuePatch, Milestone, Project, PullRequest, Repository, ReviewRequest,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Call record for `create_pull_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCall {
    pub project: Project,
    pub request: CreatePullRequest,
}

/// Call record for `update_issue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateIssueCall {
    pub number: u64,
    pub patch: IssuePatch,
}

/// Call record for `request_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCall {
    pub number: u64,
    pub request: ReviewRequest,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Canonical repository renames
/// - Transient "invalid head" failures for the first N creations
/// - Error injection for failure path testing
pub struct MockPlatformService {
    host: String,
    next_pr_number: AtomicU64,
    renames: Mutex<HashMap<String, Repository>>,
    milestones: Mutex<Vec<Milestone>>,
    requested_on_create: Mutex<(Vec<String>, Vec<String>)>,
    transient_failures: AtomicU32,
    // Call tracking
    repository_calls: Mutex<Vec<Project>>,
    create_calls: Mutex<Vec<CreateCall>>,
    update_issue_calls: Mutex<Vec<UpdateIssueCall>>,
    list_milestones_calls: Mutex<Vec<Project>>,
    review_calls: Mutex<Vec<ReviewCall>>,
    // Error injection
    error_on_repository: Mutex<Option<String>>,
    error_on_create: Mutex<Option<String>>,
    error_on_update_issue: Mutex<Option<String>>,
    error_on_request_reviewers: Mutex<Option<String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create a new mock for github.com
    pub fn new() -> Self {
        Self {
            host: "github.com".to_string(),
            next_pr_number: AtomicU64::new(1),
            renames: Mutex::new(HashMap::new()),
            milestones: Mutex::new(Vec::new()),
            requested_on_create: Mutex::new((Vec::new(), Vec::new())),
            transient_failures: AtomicU32::new(0),
            repository_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            update_issue_calls: Mutex::new(Vec::new()),
            list_milestones_calls: Mutex::new(Vec::new()),
            review_calls: Mutex::new(Vec::new()),
            error_on_repository: Mutex::new(None),
            error_on_create: Mutex::new(None),
            error_on_update_issue: Mutex::new(None),
            error_on_request_reviewers: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Report `owner/name` as living at `canonical_owner/canonical_name`
    pub fn rename(&self, owner: &str, name: &str, canonical_owner: &str, canonical_name: &str) {
        self.renames.lock().unwrap().insert(
            format!("{owner}/{name}").to_lowercase(),
            Repository {
                owner: canonical_owner.to_string(),
                name: canonical_name.to_string(),
            },
        );
    }

    /// Milestones returned by `list_milestones`
    pub fn set_milestones(&self, milestones: Vec<Milestone>) {
        *self.milestones.lock().unwrap() = milestones;
    }

    /// Reviewers/teams already requested on every created PR
    pub fn set_requested_on_create(&self, users: &[&str], teams: &[&str]) {
        *self.requested_on_create.lock().unwrap() = (
            users.iter().map(ToString::to_string).collect(),
            teams.iter().map(ToString::to_string).collect(),
        );
    }

    /// Fail the next `count` creations with an invalid head error
    pub fn fail_create_transiently(&self, count: u32) {
        self.transient_failures.store(count, Ordering::SeqCst);
    }

    // === Error injection methods ===

    /// Make `repository` return an error
    pub fn fail_repository(&self, msg: &str) {
        *self.error_on_repository.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pull_request` return a permanent error
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_issue` return an error
    pub fn fail_update_issue(&self, msg: &str) {
        *self.error_on_update_issue.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `request_reviewers` return an error
    pub fn fail_request_reviewers(&self, msg: &str) {
        *self.error_on_request_reviewers.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// All `repository` calls
    pub fn get_repository_calls(&self) -> Vec<Project> {
        self.repository_calls.lock().unwrap().clone()
    }

    /// All `create_pull_request` calls
    pub fn get_create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }

    /// All `update_issue` calls
    pub fn get_update_issue_calls(&self) -> Vec<UpdateIssueCall> {
        self.update_issue_calls.lock().unwrap().clone()
    }

    /// All `list_milestones` calls
    pub fn get_list_milestones_calls(&self) -> Vec<Project> {
        self.list_milestones_calls.lock().unwrap().clone()
    }

    /// All `request_reviewers` calls
    pub fn get_review_calls(&self) -> Vec<ReviewCall> {
        self.review_calls.lock().unwrap().clone()
    }

    /// The only create call made; panics otherwise
    pub fn single_create_call(&self) -> CreateCall {
        let calls = self.get_create_calls();
        assert_eq!(calls.len(), 1, "expected one create call, got: {calls:?}");
        calls.into_iter().next().unwrap()
    }

    /// Assert that a PR was requested from `head` into `base`
    pub fn assert_create_called(&self, head: &str, base: &str) {
        let calls = self.get_create_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.request.head == head && c.request.base == base),
            "Expected create_pull_request({head}, {base}) but got: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn repository(&self, project: &Project) -> Result<Repository> {
        self.repository_calls.lock().unwrap().push(project.clone());

        if let Some(msg) = self.error_on_repository.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let key = format!("{}/{}", project.owner, project.name).to_lowercase();
        Ok(self
            .renames
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Repository {
                owner: project.owner.clone(),
                name: project.name.clone(),
            }))
    }

    async fn create_pull_request(
        &self,
        project: &Project,
        request: &CreatePullRequest,
    ) -> Result<PullRequest> {
        self.create_calls.lock().unwrap().push(CreateCall {
            project: project.clone(),
            request: request.clone(),
        });

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::InvalidHead(request.head.clone()));
        }

        if let Some(msg) = self.error_on_create.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let (users, teams) = self.requested_on_create.lock().unwrap().clone();
        Ok(PullRequest {
            number,
            html_url: format!(
                "https://{}/{}/{}/pull/{number}",
                self.host, project.owner, project.name
            ),
            base_ref: request.base.clone(),
            head_ref: request.head.clone(),
            title: request.title.clone().unwrap_or_default(),
            requested_reviewers: users,
            requested_teams: teams,
        })
    }

    async fn update_issue(
        &self,
        _project: &Project,
        number: u64,
        patch: &IssuePatch,
    ) -> Result<()> {
        self.update_issue_calls.lock().unwrap().push(UpdateIssueCall {
            number,
            patch: patch.clone(),
        });

        if let Some(msg) = self.error_on_update_issue.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn list_milestones(&self, project: &Project) -> Result<Vec<Milestone>> {
        self.list_milestones_calls
            .lock()
            .unwrap()
            .push(project.clone());
        Ok(self.milestones.lock().unwrap().clone())
    }

    async fn request_reviewers(
        &self,
        _project: &Project,
        number: u64,
        request: &ReviewRequest,
    ) -> Result<()> {
        self.review_calls.lock().unwrap().push(ReviewCall {
            number,
            request: request.clone(),
        });

        if let Some(msg) = self.error_on_request_reviewers.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }
}
