//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, editor plugins, etc.) to
//! receive progress updates during submission.

use crate::error::Error;
use crate::types::PullRequest;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Resolving base and head
    Resolving,
    /// Assembling title and body
    Composing,
    /// Pushing the head branch
    Pushing,
    /// Creating the pull request
    Creating,
    /// Applying labels, assignees, milestone and reviewers
    ApplyingMetadata,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Resolving => "Resolving branches",
            Self::Composing => "Composing message",
            Self::Pushing => "Pushing",
            Self::Creating => "Creating pull request",
            Self::ApplyingMetadata => "Applying metadata",
            Self::Complete => "Done",
        };
        f.write_str(s)
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during submission.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when the head branch is being pushed
    async fn on_push(&self, remote: &str, branch: &str, status: PushStatus);

    /// Called before waiting to retry creation
    async fn on_retry(&self, attempt: u32, delay: Duration);

    /// Called when the PR is created
    async fn on_pr_created(&self, pr: &PullRequest);

    /// Called when an error occurs (non-fatal)
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_push(&self, _remote: &str, _branch: &str, _status: PushStatus) {}
    async fn on_retry(&self, _attempt: u32, _delay: Duration) {}
    async fn on_pr_created(&self, _pr: &PullRequest) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
