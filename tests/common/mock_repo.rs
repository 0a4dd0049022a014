//! Mock local repository, editor, clock and progress for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use prflow::editor::Editor;
use prflow::error::{Error, Result};
use prflow::repo::LocalRepository;
use prflow::submit::{Clock, Phase, ProgressCallback, PushStatus};
use prflow::types::{Branch, GitRemote, PullRequest};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Call record for `push`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCall {
    pub remote: String,
    pub head: String,
}

/// In-memory repository state
///
/// Commit lists are keyed by the exact `(base, head)` pair passed to
/// `ref_list`; unknown pairs have no commits.
pub struct MockRepository {
    pub current: Branch,
    pub remotes: Vec<GitRemote>,
    pub default_branches: HashMap<String, String>,
    pub tracking: Option<Branch>,
    pub commits: HashMap<(String, String), Vec<String>>,
    pub messages: HashMap<String, String>,
    pub log_text: String,
    pub workdir: Option<PathBuf>,
    pub template: Option<String>,
    pub git_dir: PathBuf,
    push_calls: Mutex<Vec<PushCall>>,
    ref_list_calls: Mutex<Vec<(String, String)>>,
    error_on_push: Mutex<Option<String>>,
}

impl MockRepository {
    /// Repository on branch `current` with the given remotes
    ///
    /// `git_dir` should be a scratch directory; the message file is written
    /// there.
    pub fn new(current: &str, remotes: Vec<GitRemote>, git_dir: &Path) -> Self {
        Self {
            current: Branch::local(current),
            remotes,
            default_branches: HashMap::new(),
            tracking: None,
            commits: HashMap::new(),
            messages: HashMap::new(),
            log_text: String::new(),
            workdir: Some(PathBuf::from("/work/widget")),
            template: None,
            git_dir: git_dir.to_path_buf(),
            push_calls: Mutex::new(Vec::new()),
            ref_list_calls: Mutex::new(Vec::new()),
            error_on_push: Mutex::new(None),
        }
    }

    /// Set the default branch of `remote`
    #[must_use]
    pub fn with_default_branch(mut self, remote: &str, branch: &str) -> Self {
        self.default_branches
            .insert(remote.to_string(), branch.to_string());
        self
    }

    /// Set the branch the current branch tracks
    #[must_use]
    pub fn with_tracking(mut self, tracking: Branch) -> Self {
        self.tracking = Some(tracking);
        self
    }

    /// Commits (newest first) between `base` and `head`
    #[must_use]
    pub fn with_commits(mut self, base: &str, head: &str, commits: &[&str]) -> Self {
        self.commits.insert(
            (base.to_string(), head.to_string()),
            commits.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Full message of `commit`
    #[must_use]
    pub fn with_message(mut self, commit: &str, message: &str) -> Self {
        self.messages
            .insert(commit.to_string(), message.to_string());
        self
    }

    /// Output of `log`
    #[must_use]
    pub fn with_log(mut self, log: &str) -> Self {
        self.log_text = log.to_string();
        self
    }

    /// Pull request template contents
    #[must_use]
    pub fn with_template(mut self, template: &str) -> Self {
        self.template = Some(template.to_string());
        self
    }

    /// Make `push` fail
    pub fn fail_push(&self, msg: &str) {
        *self.error_on_push.lock().unwrap() = Some(msg.to_string());
    }

    /// All `push` calls
    pub fn get_push_calls(&self) -> Vec<PushCall> {
        self.push_calls.lock().unwrap().clone()
    }

    /// All `ref_list` calls as `(base, head)`
    pub fn get_ref_list_calls(&self) -> Vec<(String, String)> {
        self.ref_list_calls.lock().unwrap().clone()
    }

    /// Path of the message edit buffer
    pub fn message_file(&self) -> PathBuf {
        self.git_dir.join(prflow::submit::MESSAGE_FILENAME)
    }
}

impl LocalRepository for MockRepository {
    fn current_branch(&self) -> Result<Branch> {
        Ok(self.current.clone())
    }

    fn remotes(&self) -> Result<Vec<GitRemote>> {
        Ok(self.remotes.clone())
    }

    fn default_branch(&self, remote: &str) -> Result<String> {
        Ok(self
            .default_branches
            .get(remote)
            .cloned()
            .unwrap_or_else(|| "master".to_string()))
    }

    fn tracking_branch(&self, _branch: &Branch) -> Result<Option<Branch>> {
        Ok(self.tracking.clone())
    }

    fn push(&self, remote: &str, head: &str) -> Result<()> {
        self.push_calls.lock().unwrap().push(PushCall {
            remote: remote.to_string(),
            head: head.to_string(),
        });

        if let Some(msg) = self.error_on_push.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        Ok(())
    }

    fn ref_list(&self, base: &str, head: &str) -> Result<Vec<String>> {
        self.ref_list_calls
            .lock()
            .unwrap()
            .push((base.to_string(), head.to_string()));
        Ok(self
            .commits
            .get(&(base.to_string(), head.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn commit_message(&self, commit: &str) -> Result<String> {
        self.messages
            .get(commit)
            .cloned()
            .ok_or_else(|| Error::Git(format!("unknown commit {commit}")))
    }

    fn log(&self, _base: &str, _head: &str) -> Result<String> {
        Ok(self.log_text.clone())
    }

    fn workdir(&self) -> Result<Option<PathBuf>> {
        Ok(self.workdir.clone())
    }

    fn pull_request_template(&self) -> Result<Option<String>> {
        Ok(self.template.clone())
    }

    fn git_dir(&self) -> Result<PathBuf> {
        Ok(self.git_dir.clone())
    }
}

/// Editor that returns a fixed result and records what it was shown
pub struct ScriptedEditor {
    result: Option<String>,
    shown: Mutex<Vec<String>>,
}

impl ScriptedEditor {
    /// Editor that saves `text`
    pub fn saving(text: &str) -> Self {
        Self {
            result: Some(text.to_string()),
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Editor that quits without saving
    pub fn aborting() -> Self {
        Self {
            result: None,
            shown: Mutex::new(Vec::new()),
        }
    }

    /// Buffers the editor was opened with
    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, text: &str) -> Result<Option<String>> {
        self.shown.lock().unwrap().push(text.to_string());
        Ok(self.result.clone())
    }
}

/// Clock that advances only when slept on
pub struct ManualClock {
    start: Instant,
    elapsed: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Clock at time zero
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    /// Every sleep requested, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    /// Sleeps in whole seconds
    pub fn sleep_secs(&self) -> Vec<u64> {
        self.sleeps().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        *self.elapsed.lock().unwrap() += duration;
    }
}

/// Progress event, as recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Phase(Phase),
    Push(String, String, PushStatus),
    Retry(u32, Duration),
    Created(u64),
    Error(String),
    Message(String),
}

/// Progress callback that records every event
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<Event>>,
}

impl RecordingProgress {
    /// All recorded events
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded status messages
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.record(Event::Phase(phase));
    }

    async fn on_push(&self, remote: &str, branch: &str, status: PushStatus) {
        self.record(Event::Push(remote.to_string(), branch.to_string(), status));
    }

    async fn on_retry(&self, attempt: u32, delay: Duration) {
        self.record(Event::Retry(attempt, delay));
    }

    async fn on_pr_created(&self, pr: &PullRequest) {
        self.record(Event::Created(pr.number));
    }

    async fn on_error(&self, error: &Error) {
        self.record(Event::Error(error.to_string()));
    }

    async fn on_message(&self, message: &str) {
        self.record(Event::Message(message.to_string()));
    }
}
