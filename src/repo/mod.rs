//! Local git repository access
//!
//! [`LocalRepository`] is everything the submission workflow reads from (or
//! pushes out of) the working copy. [`SystemGit`] implements it by shelling
//! out to `git`.

mod git;
mod template;

pub use git::SystemGit;
pub use template::find_template;

use crate::error::{Error, Result};
use crate::platform::parse_remote_url;
use crate::types::{Branch, GitRemote, Project};
use std::path::PathBuf;

/// Remote names preferred when picking the main project, in order
const PREFERRED_REMOTES: [&str; 3] = ["upstream", "github", "origin"];

/// Read access to a local repository, plus push
pub trait LocalRepository: Send + Sync {
    /// Currently checked out branch
    fn current_branch(&self) -> Result<Branch>;

    /// Configured remotes in config order
    fn remotes(&self) -> Result<Vec<GitRemote>>;

    /// Default branch of `remote` (its `HEAD`)
    fn default_branch(&self, remote: &str) -> Result<String>;

    /// Branch that `branch` is configured to track, if any
    fn tracking_branch(&self, branch: &Branch) -> Result<Option<Branch>>;

    /// Push `HEAD` to `remote` as `head`, setting upstream
    fn push(&self, remote: &str, head: &str) -> Result<()>;

    /// Commits reachable from `head` but not `base`, newest first
    fn ref_list(&self, base: &str, head: &str) -> Result<Vec<String>>;

    /// Full message of one commit
    fn commit_message(&self, commit: &str) -> Result<String>;

    /// Human-readable log of commits between `base` and `head`
    fn log(&self, base: &str, head: &str) -> Result<String>;

    /// Root of the working tree, if there is one
    fn workdir(&self) -> Result<Option<PathBuf>>;

    /// Contents of the pull request template in the working tree
    fn pull_request_template(&self) -> Result<Option<String>>;

    /// The `.git` directory
    fn git_dir(&self) -> Result<PathBuf>;
}

/// Project a remote points at, if it's on a supported host
pub fn remote_project(remote: &GitRemote) -> Option<Project> {
    parse_remote_url(&remote.url).ok()
}

/// Pick the project pull requests target by default
///
/// Remotes named `upstream`, `github` and `origin` win in that order,
/// otherwise the first remote on a supported host.
pub fn main_project(remotes: &[GitRemote]) -> Result<Project> {
    let mut candidates: Vec<(usize, Project)> = remotes
        .iter()
        .enumerate()
        .filter_map(|(idx, remote)| {
            let project = remote_project(remote)?;
            let rank = PREFERRED_REMOTES
                .iter()
                .position(|name| *name == remote.name)
                .unwrap_or(PREFERRED_REMOTES.len() + idx);
            Some((rank, project))
        })
        .collect();

    candidates.sort_by_key(|(rank, _)| *rank);
    candidates
        .into_iter()
        .next()
        .map(|(_, project)| project)
        .ok_or(Error::NoSupportedRemotes)
}

/// First remote pointing at `project`
pub fn remote_for_project<'a>(
    remotes: &'a [GitRemote],
    project: &Project,
) -> Option<&'a GitRemote> {
    remotes
        .iter()
        .find(|remote| remote_project(remote).is_some_and(|p| p == *project))
}

/// Project of a named remote
pub fn project_for_remote(remotes: &[GitRemote], name: &str) -> Result<Project> {
    let remote = remotes
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| Error::RemoteNotFound(name.to_string()))?;
    remote_project(remote).ok_or(Error::NoSupportedRemotes)
}
