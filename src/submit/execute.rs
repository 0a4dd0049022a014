//! Phase 4: Submission execution
//!
//! Pushes the head if asked, then creates the pull request. Creation right
//! after a push can fail because the service hasn't seen the new branch yet;
//! that failure is retried with a growing delay until a time allowance runs
//! out.

use crate::config::{DEFAULT_RETRY_ALLOWANCE_SECS, retry_allowance_from_env};
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::repo::LocalRepository;
use crate::submit::{Clock, Phase, ProgressCallback, PushStatus};
use crate::types::{PullRequest, PullRequestDraft};
use std::time::Duration;
use tracing::{info, warn};

/// Remote and branch name to push `HEAD` to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    /// Remote name
    pub remote: String,
    /// Branch name on the remote
    pub head: String,
}

/// How long to keep retrying an unseen head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total seconds that may be spent waiting
    pub allowance_secs: u64,
    /// First delay; each retry waits one second longer
    pub initial_delay_secs: u64,
}

impl RetryPolicy {
    /// Policy with the given allowance
    pub const fn new(allowance_secs: u64) -> Self {
        Self {
            allowance_secs,
            initial_delay_secs: 2,
        }
    }

    /// Policy with the allowance from the environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(retry_allowance_from_env()?))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ALLOWANCE_SECS)
    }
}

/// Pushes and creates a pull request
pub struct Submitter<'a> {
    platform: &'a dyn PlatformService,
    repo: &'a dyn LocalRepository,
    clock: &'a dyn Clock,
    progress: &'a dyn ProgressCallback,
}

impl<'a> Submitter<'a> {
    /// New submitter over the given collaborators
    pub fn new(
        platform: &'a dyn PlatformService,
        repo: &'a dyn LocalRepository,
        clock: &'a dyn Clock,
        progress: &'a dyn ProgressCallback,
    ) -> Self {
        Self {
            platform,
            repo,
            clock,
            progress,
        }
    }

    /// Submit `draft`, pushing to `push` first when given
    ///
    /// The retry allowance is read from the environment only when pushing.
    pub async fn submit(
        &self,
        draft: &PullRequestDraft,
        push: Option<&PushTarget>,
    ) -> Result<PullRequest> {
        let policy = match push {
            Some(_) => RetryPolicy::from_env()?,
            None => RetryPolicy::default(),
        };
        self.submit_with_policy(draft, push, policy).await
    }

    /// Submit `draft` with an explicit retry policy
    pub async fn submit_with_policy(
        &self,
        draft: &PullRequestDraft,
        push: Option<&PushTarget>,
        policy: RetryPolicy,
    ) -> Result<PullRequest> {
        if let Some(target) = push {
            self.push(target).await?;
        }

        self.progress.on_phase(Phase::Creating).await;

        let request = draft.to_request();
        let started = self.clock.now();
        let mut allowance = policy.allowance_secs;
        let mut delay = policy.initial_delay_secs;
        let mut retries: u32 = 0;

        loop {
            let err = match self
                .platform
                .create_pull_request(&draft.base_project, &request)
                .await
            {
                Ok(pr) => {
                    info!(number = pr.number, url = %pr.html_url, "created pull request");
                    self.progress.on_pr_created(&pr).await;
                    return Ok(pr);
                }
                Err(e) => e,
            };

            if push.is_some() && err.is_transient() && allowance > 0 {
                allowance = allowance.saturating_sub(delay);
                retries += 1;
                let wait = Duration::from_secs(delay);
                warn!(
                    attempt = retries,
                    delay_secs = delay,
                    error = %err,
                    "head not visible yet, retrying"
                );
                self.progress.on_retry(retries, wait).await;
                self.clock.sleep(wait).await;
                delay += 1;
                continue;
            }

            if retries == 0 {
                return Err(err);
            }

            let elapsed_secs = self.clock.now().duration_since(started).as_secs_f64();
            return Err(Error::RetriesExhausted {
                source: Box::new(err),
                elapsed_secs,
                retries,
            });
        }
    }

    async fn push(&self, target: &PushTarget) -> Result<()> {
        self.progress.on_phase(Phase::Pushing).await;
        self.progress
            .on_push(&target.remote, &target.head, PushStatus::Started)
            .await;

        match self.repo.push(&target.remote, &target.head) {
            Ok(()) => {
                self.progress
                    .on_push(&target.remote, &target.head, PushStatus::Success)
                    .await;
                Ok(())
            }
            Err(e) => {
                self.progress
                    .on_push(&target.remote, &target.head, PushStatus::Failed(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }
}
