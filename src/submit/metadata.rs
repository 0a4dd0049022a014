//! Phase 5: Metadata
//!
//! Labels, assignees, milestone and review requests are applied after the
//! pull request exists. Failures here are collected, never undo creation.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::submit::{Phase, ProgressCallback};
use crate::types::{IssuePatch, Milestone, Project, PullRequest, ReviewRequest};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Metadata requested on the command line
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// `-l` values, each possibly comma-separated
    pub labels: Vec<String>,
    /// `-a` values, each possibly comma-separated
    pub assignees: Vec<String>,
    /// `-M` milestone title or number
    pub milestone: Option<String>,
    /// `-r` values: users, or `org/team` for teams
    pub reviewers: Vec<String>,
}

impl MetadataOptions {
    /// Whether nothing was requested
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.assignees.is_empty()
            && self.milestone.is_none()
            && self.reviewers.is_empty()
    }
}

/// What happened while applying metadata
#[derive(Debug, Default)]
pub struct MetadataReport {
    /// Labels/assignees/milestone were sent
    pub issue_patched: bool,
    /// Review requests were sent
    pub reviewers_requested: bool,
    /// Failures, in the order they happened
    pub errors: Vec<Error>,
}

impl MetadataReport {
    /// Whether everything requested was applied
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Split comma-separated values, trimming and dropping blanks and repeats
pub fn split_comma_separated(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.to_string()))
        .map(ToString::to_string)
        .collect()
}

/// Number of the milestone titled `name`, ignoring case
pub fn find_milestone_number(milestones: &[Milestone], name: &str) -> Option<u64> {
    milestones
        .iter()
        .find(|m| m.title.eq_ignore_ascii_case(name))
        .map(|m| m.number)
}

/// Milestone number for a `-M` token
///
/// Numbers are used as-is, `0` clearing the milestone. Anything else is
/// looked up by title.
pub async fn resolve_milestone(
    platform: &dyn PlatformService,
    project: &Project,
    token: &str,
) -> Result<Option<u64>> {
    let token = token.trim();
    if let Ok(number) = token.parse::<u64>() {
        return Ok((number > 0).then_some(number));
    }

    let milestones = platform.list_milestones(project).await?;
    find_milestone_number(&milestones, token)
        .map(Some)
        .ok_or_else(|| Error::MilestoneNotFound(token.to_string()))
}

/// Review request for `reviewers`, minus those already requested on `pr`
///
/// A token containing `/` names a team; only the part after the first `/`
/// is sent.
pub fn build_review_request(pr: &PullRequest, reviewers: &[String]) -> ReviewRequest {
    let mut request = ReviewRequest::default();

    for token in split_comma_separated(reviewers) {
        match token.split_once('/') {
            Some((_, team)) => {
                let already = pr.has_requested_team(team)
                    || request.team_reviewers.iter().any(|t| t.eq_ignore_ascii_case(team));
                if !already {
                    request.team_reviewers.push(team.to_string());
                }
            }
            None => {
                let already = pr.has_requested_reviewer(&token)
                    || request.reviewers.iter().any(|r| r.eq_ignore_ascii_case(&token));
                if !already {
                    request.reviewers.push(token);
                }
            }
        }
    }

    request
}

async fn build_issue_patch(
    platform: &dyn PlatformService,
    project: &Project,
    options: &MetadataOptions,
) -> Result<IssuePatch> {
    let milestone = match options.milestone.as_deref() {
        Some(token) => resolve_milestone(platform, project, token).await?,
        None => None,
    };

    Ok(IssuePatch {
        labels: split_comma_separated(&options.labels),
        assignees: split_comma_separated(&options.assignees),
        milestone,
    })
}

/// Apply labels, assignees, milestone and reviewers to a new pull request
pub async fn apply_metadata(
    platform: &dyn PlatformService,
    project: &Project,
    pr: &PullRequest,
    options: &MetadataOptions,
    progress: &dyn ProgressCallback,
) -> MetadataReport {
    let mut report = MetadataReport::default();
    if options.is_empty() {
        return report;
    }

    progress.on_phase(Phase::ApplyingMetadata).await;

    let patched = match build_issue_patch(platform, project, options).await {
        Ok(patch) if patch.is_empty() => Ok(false),
        Ok(patch) => {
            debug!(number = pr.number, ?patch, "updating issue metadata");
            platform
                .update_issue(project, pr.number, &patch)
                .await
                .map(|()| true)
        }
        Err(e) => Err(e),
    };
    match patched {
        Ok(sent) => report.issue_patched = sent,
        Err(e) => {
            warn!(number = pr.number, error = %e, "failed to update issue metadata");
            progress.on_error(&e).await;
            report.errors.push(e);
        }
    }

    let request = build_review_request(pr, &options.reviewers);
    if !request.is_empty() {
        debug!(number = pr.number, ?request, "requesting reviews");
        match platform.request_reviewers(project, pr.number, &request).await {
            Ok(()) => report.reviewers_requested = true,
            Err(e) => {
                warn!(number = pr.number, error = %e, "failed to request reviewers");
                progress.on_error(&e).await;
                report.errors.push(e);
            }
        }
    }

    report
}
