//! CLI progress callback with styled output and a spinner
//!
//! Progress is written to stderr so stdout stays clean for the URL.

use crate::cli::style::{Stylize, arrow, check, cross, hyperlink_url, spinner_style};
use anstream::eprintln;
use async_trait::async_trait;
use indicatif::ProgressBar;
use prflow::error::Error;
use prflow::submit::{Phase, ProgressCallback, PushStatus};
use prflow::types::PullRequest;
use std::sync::Mutex;
use std::time::Duration;

/// CLI progress callback
///
/// Phases are only announced in verbose mode; pushes, creation and
/// failures always are. A spinner runs while waiting on the API.
pub struct CliProgress {
    verbose: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// New progress reporter
    pub const fn new(verbose: bool) -> Self {
        Self {
            verbose,
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        let spinner = slot.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });
        spinner.set_message(message);
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Creating => self.start_spinner(format!("{phase}...")),
            Phase::Complete => self.stop_spinner(),
            _ if self.verbose => eprintln!("{}", format!("{phase}...").muted()),
            _ => {}
        }
    }

    async fn on_push(&self, remote: &str, branch: &str, status: PushStatus) {
        let target = format!("{remote}/{branch}");
        match &status {
            PushStatus::Started => eprintln!("{} Pushing {}", arrow(), target.accent()),
            PushStatus::Success => eprintln!("{} Pushed {}", check(), target.accent()),
            PushStatus::Failed(_) => {
                eprintln!("{} Push to {} {}", cross(), target.accent(), status.to_string().error());
            }
        }
    }

    async fn on_retry(&self, attempt: u32, delay: Duration) {
        self.start_spinner(format!(
            "Waiting for the head branch to show up (retry {attempt} in {}s)...",
            delay.as_secs()
        ));
    }

    async fn on_pr_created(&self, pr: &PullRequest) {
        self.stop_spinner();
        let number = format!("#{}", pr.number);
        eprintln!("{} Created pull request {}", check(), number.accent());
        eprintln!("  {}", hyperlink_url(&pr.html_url));
    }

    async fn on_error(&self, error: &Error) {
        self.stop_spinner();
        eprintln!("{}: {error}", "warning".warn());
    }

    async fn on_message(&self, message: &str) {
        eprintln!("{}", message.muted());
    }
}
