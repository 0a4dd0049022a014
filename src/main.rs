//! prflow - open GitHub pull requests from a git checkout
//!
//! CLI binary for submitting the current branch as a pull request.

use anyhow::Result;
use clap::{ArgAction, Parser};
use prflow::config::LOG_ENV;
use prflow::submit::{
    MessageOptions, MetadataOptions, RefOptions, SubmitOptions, parse_issue_number,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "prflow")]
#[command(about = "Open a pull request on GitHub for the current branch")]
#[command(version)]
#[command(disable_help_flag = true)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Skip the check for local commits not yet pushed upstream
    #[arg(short, long)]
    force: bool,

    /// Message paragraph; repeat for more paragraphs (first is the title)
    #[arg(short, long = "message", value_name = "MESSAGE", action = ArgAction::Append)]
    messages: Vec<String>,

    /// Use the first commit's message without opening an editor
    #[arg(long)]
    no_edit: bool,

    /// Read the message from a file ("-" for standard input)
    #[arg(short = 'F', long, value_name = "FILE")]
    file: Option<String>,

    /// Open the message from -m/-F in an editor first
    #[arg(short, long)]
    edit: bool,

    /// Convert this issue into a pull request
    #[arg(short, long, value_name = "ISSUE")]
    issue: Option<u64>,

    /// Issue URL to convert (used when -i is not given)
    #[arg(value_name = "ISSUE_URL")]
    issue_url: Option<String>,

    /// Open the new pull request in a web browser
    #[arg(short = 'o', long)]
    browse: bool,

    /// Copy the pull request URL to the clipboard
    #[arg(short, long)]
    copy: bool,

    /// Push the current branch to the head before creating
    #[arg(short, long)]
    push: bool,

    /// Base branch, as [OWNER[/REPO]:]BRANCH
    #[arg(short, long)]
    base: Option<String>,

    /// Head branch, as [OWNER[/REPO]:]BRANCH
    #[arg(short, long)]
    head: Option<String>,

    /// Request reviews from users or teams (ORG/TEAM), comma-separated
    #[arg(short, long = "reviewer", value_name = "USERS", action = ArgAction::Append)]
    reviewers: Vec<String>,

    /// Assign users, comma-separated
    #[arg(short, long = "assign", value_name = "USERS", action = ArgAction::Append)]
    assignees: Vec<String>,

    /// Milestone name or number
    #[arg(short = 'M', long)]
    milestone: Option<String>,

    /// Labels, comma-separated
    #[arg(short, long = "labels", value_name = "LABELS", action = ArgAction::Append)]
    labels: Vec<String>,

    /// Open as a draft pull request
    #[arg(short, long)]
    draft: bool,

    /// Show what would be done without pushing or creating anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', value_name = "PATH")]
    path: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn submit_options(&self) -> SubmitOptions {
        let issue = self
            .issue
            .or_else(|| self.issue_url.as_deref().and_then(parse_issue_number));

        SubmitOptions {
            refs: RefOptions {
                base: self.base.clone(),
                head: self.head.clone(),
                push: self.push,
            },
            message: MessageOptions {
                messages: self.messages.clone(),
                file: self.file.clone(),
                edit: self.edit,
                no_edit: self.no_edit,
                issue,
            },
            metadata: MetadataOptions {
                labels: self.labels.clone(),
                assignees: self.assignees.clone(),
                milestone: self.milestone.clone(),
                reviewers: self.reviewers.clone(),
            },
            force: self.force,
            draft: self.draft,
            dry_run: self.dry_run,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "prflow=debug" } else { "prflow=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let path = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let options = cli.submit_options();
    let presentation = cli::Presentation {
        browse: cli.browse,
        copy: cli.copy,
    };

    cli::run_submit(&path, &options, presentation, cli.verbose).await?;

    Ok(())
}
