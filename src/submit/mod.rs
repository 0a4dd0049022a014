//! Pull request submission engine
//!
//! Handles the workflow of turning the current branch into a pull request:
//! 1. Resolution - work out base and head projects and branches
//! 2. Composition - assemble title and body
//! 3. Planning - pre-flight checks and the draft
//! 4. Execution - push, create, retry
//! 5. Metadata - labels, assignees, milestone, reviewers

mod clock;
mod execute;
mod message;
mod metadata;
mod plan;
mod progress;
mod refs;

pub use clock::{Clock, SystemClock};
pub use execute::{PushTarget, RetryPolicy, Submitter};
pub use message::{
    AssembledMessage, MESSAGE_FILENAME, MessageBuilder, MessageOptions, MessageSource,
    STDIN_FILENAME, assemble_message, read_message_file, split_title_body, strip_signoff,
};
pub use metadata::{
    MetadataOptions, MetadataReport, apply_metadata, build_review_request,
    find_milestone_number, resolve_milestone, split_comma_separated,
};
pub use plan::{build_draft, check_unpushed, parse_issue_number};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use refs::{RefOptions, ResolvedRefs, default_head, parse_ref, resolve_refs};

use crate::editor::Editor;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::repo::LocalRepository;
use crate::types::PullRequest;
use tracing::debug;

/// URL reported by a dry run
pub const DRY_RUN_URL: &str = "PULL_REQUEST_URL";

/// Everything the user asked for
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    /// Base, head and push
    pub refs: RefOptions,
    /// Message sources and issue conversion
    pub message: MessageOptions,
    /// Post-creation metadata
    pub metadata: MetadataOptions,
    /// Skip the unpushed commits check
    pub force: bool,
    /// Open as draft
    pub draft: bool,
    /// Report what would happen without pushing or creating
    pub dry_run: bool,
}

/// Collaborators a submission runs against
pub struct SubmitContext<'a> {
    /// Local repository
    pub repo: &'a dyn LocalRepository,
    /// Hosting service
    pub platform: &'a dyn PlatformService,
    /// Message editor
    pub editor: &'a dyn Editor,
    /// Time source for retries
    pub clock: &'a dyn Clock,
    /// Progress reporting
    pub progress: &'a dyn ProgressCallback,
}

/// Result of a submission
#[derive(Debug)]
pub struct SubmissionOutcome {
    /// URL of the pull request, or [`DRY_RUN_URL`]
    pub url: String,
    /// The created pull request (absent in a dry run)
    pub pull_request: Option<PullRequest>,
    /// What happened to labels, assignees, milestone and reviewers
    pub metadata: MetadataReport,
}

/// Resolve, compose, push, create and decorate a pull request
///
/// Nothing is pushed or created before the refs and message are complete.
pub async fn submit_pull_request(
    ctx: &SubmitContext<'_>,
    options: &SubmitOptions,
) -> Result<SubmissionOutcome> {
    ctx.progress.on_phase(Phase::Resolving).await;
    let refs = resolve_refs(ctx.repo, ctx.platform, &options.refs).await?;
    check_unpushed(ctx.repo, refs.tracking.as_ref(), options.force)?;

    ctx.progress.on_phase(Phase::Composing).await;
    let message = assemble_message(
        ctx.repo,
        ctx.editor,
        &refs,
        &options.message,
        options.refs.push,
    )?;

    let draft = build_draft(&refs, &message, options.draft, options.message.issue);
    let push = if options.refs.push {
        refs.push_target()
    } else {
        None
    };

    if options.dry_run {
        ctx.progress
            .on_message("Dry run - no changes will be made")
            .await;
        if let Some(target) = &push {
            ctx.progress
                .on_message(&format!("Would push to {}/{}", target.remote, target.head))
                .await;
        }
        ctx.progress
            .on_message(&format!(
                "Would request a pull request to {} from {}",
                refs.qualified_base(),
                refs.qualified_head()
            ))
            .await;
        ctx.progress.on_phase(Phase::Complete).await;
        return Ok(SubmissionOutcome {
            url: DRY_RUN_URL.to_string(),
            pull_request: None,
            metadata: MetadataReport::default(),
        });
    }

    let submitter = Submitter::new(ctx.platform, ctx.repo, ctx.clock, ctx.progress);
    let pr = submitter.submit(&draft, push.as_ref()).await?;

    if let Err(e) = message.cleanup() {
        debug!(error = %e, "could not remove message file");
    }

    let metadata = apply_metadata(
        ctx.platform,
        &refs.base_project,
        &pr,
        &options.metadata,
        ctx.progress,
    )
    .await;

    ctx.progress.on_phase(Phase::Complete).await;

    Ok(SubmissionOutcome {
        url: pr.html_url.clone(),
        pull_request: Some(pr),
        metadata,
    })
}
