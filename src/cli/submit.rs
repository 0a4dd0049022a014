//! Submit command - open a pull request for the current branch

use crate::cli::output::{Presentation, present_url};
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, cross};
use anstream::eprintln;
use prflow::editor::SystemEditor;
use prflow::error::{Error, Result};
use prflow::platform::create_platform_service;
use prflow::repo::{LocalRepository, SystemGit, main_project};
use prflow::submit::{SubmitContext, SubmitOptions, SystemClock, submit_pull_request};
use std::path::Path;
use tracing::debug;

/// Run the submit command
pub async fn run_submit(
    path: &Path,
    options: &SubmitOptions,
    presentation: Presentation,
    verbose: bool,
) -> Result<()> {
    let repo = SystemGit::open(path)?;
    let remotes = repo.remotes()?;
    let project = main_project(&remotes)?;
    debug!(%project, "main project");

    let platform = create_platform_service(&project).await?;
    let editor = SystemEditor::markdown();
    let progress = CliProgress::new(verbose);

    let ctx = SubmitContext {
        repo: &repo,
        platform: platform.as_ref(),
        editor: &editor,
        clock: &SystemClock,
        progress: &progress,
    };

    let outcome = submit_pull_request(&ctx, options).await?;

    if options.dry_run {
        present_url(&outcome.url, Presentation::default())?;
    } else {
        present_url(&outcome.url, presentation)?;
    }

    if !outcome.metadata.is_success() {
        let count = outcome.metadata.errors.len();
        eprintln!(
            "{} Pull request created, but {} metadata update{} failed",
            cross(),
            count.to_string().accent(),
            if count == 1 { "" } else { "s" }
        );
        return Err(Error::Platform(
            outcome
                .metadata
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        ));
    }

    Ok(())
}
