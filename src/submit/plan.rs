//! Phase 3: Submission planning
//!
//! Pre-flight checks and the draft that gets submitted.

use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::submit::{AssembledMessage, ResolvedRefs};
use crate::types::{Branch, PullRequestDraft};
use tracing::debug;
use url::Url;

/// Refuse to continue while `HEAD` has commits its tracking branch lacks
///
/// Skipped with `force`, or when there is no remote tracking branch.
pub fn check_unpushed(
    repo: &dyn LocalRepository,
    tracking: Option<&Branch>,
    force: bool,
) -> Result<()> {
    let Some(tracking) = tracking.filter(|t| t.is_remote()) else {
        return Ok(());
    };
    if force {
        return Ok(());
    }

    let tracking_name = tracking.long_name();
    let count = match repo.ref_list(&tracking_name, "HEAD") {
        Ok(commits) => commits.len(),
        Err(e) => {
            debug!(tracking = %tracking_name, error = %e, "cannot compare with tracking branch");
            0
        }
    };

    if count > 0 {
        return Err(Error::UnpushedCommits {
            count,
            tracking: format!(
                "{}/{}",
                tracking.remote.as_deref().unwrap_or_default(),
                tracking.short_name
            ),
        });
    }

    Ok(())
}

/// Issue number from an `https://<host>/<owner>/<repo>/issues/<n>` URL
pub fn parse_issue_number(raw: &str) -> Option<u64> {
    let url = Url::parse(raw).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [_owner, _repo, "issues", number] => number.parse().ok(),
        _ => None,
    }
}

/// Combine resolved refs and message into a draft
pub fn build_draft(
    refs: &ResolvedRefs,
    message: &AssembledMessage,
    draft: bool,
    issue: Option<u64>,
) -> PullRequestDraft {
    PullRequestDraft {
        base_project: refs.base_project.clone(),
        base_ref: refs.base_ref.clone(),
        head_project: refs.head_project.clone(),
        head_ref: refs.head_ref.clone(),
        title: message.title.clone(),
        body: message.body.clone(),
        draft,
        issue,
    }
}
