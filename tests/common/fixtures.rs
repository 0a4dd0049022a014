//! Test data factories for prflow types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use prflow::types::{Branch, GitRemote, Milestone, Project};

/// Upstream organization used throughout the tests
pub const UPSTREAM_OWNER: &str = "octo";

/// Fork owner used throughout the tests
pub const FORK_OWNER: &str = "me";

/// Repository name used throughout the tests
pub const REPO_NAME: &str = "widget";

/// A remote with an SSH URL on github.com
pub fn ssh_remote(name: &str, owner: &str, repo: &str) -> GitRemote {
    GitRemote {
        name: name.to_string(),
        url: format!("git@github.com:{owner}/{repo}.git"),
    }
}

/// A remote with an HTTPS URL on github.com
pub fn https_remote(name: &str, owner: &str, repo: &str) -> GitRemote {
    GitRemote {
        name: name.to_string(),
        url: format!("https://github.com/{owner}/{repo}.git"),
    }
}

/// Only `origin`, pointing at the upstream project
pub fn single_origin() -> Vec<GitRemote> {
    vec![ssh_remote("origin", UPSTREAM_OWNER, REPO_NAME)]
}

/// `origin` is the fork, `upstream` the main project
pub fn fork_remotes() -> Vec<GitRemote> {
    vec![
        ssh_remote("origin", FORK_OWNER, REPO_NAME),
        https_remote("upstream", UPSTREAM_OWNER, REPO_NAME),
    ]
}

/// Project on github.com
pub fn project(owner: &str, name: &str) -> Project {
    Project::new("github.com", owner, name)
}

/// Remote-tracking branch
pub fn remote_branch(remote: &str, name: &str) -> Branch {
    Branch::remote(remote, name)
}

/// Milestone
pub fn milestone(number: u64, title: &str) -> Milestone {
    Milestone {
        number,
        title: title.to_string(),
    }
}

/// Strings from string slices
pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
