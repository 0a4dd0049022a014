//! Project detection from remote URLs

use crate::config::github_host_from_env;
use crate::error::{Error, Result};
use crate::types::{GITHUB_HOST, Project};
use regex::Regex;
use std::sync::LazyLock;

static RE_SCP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^@/]+@)?([^:/]+):(.+?)(?:\.git)?/?$").expect("hardcoded regex is valid")
});
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z+]+://[^/]+/(.+?)(?:\.git)?/?$").expect("hardcoded regex is valid")
});

/// Whether `hostname` is GitHub or the configured Enterprise host
pub fn is_supported_host(hostname: &str) -> bool {
    hostname.eq_ignore_ascii_case(GITHUB_HOST)
        || hostname.to_ascii_lowercase().ends_with(".github.com")
        || github_host_from_env().is_some_and(|h| hostname.eq_ignore_ascii_case(&h))
}

/// Parse a remote URL into a project
///
/// Accepts `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo` and
/// scp-like `git@host:owner/repo(.git)`.
pub fn parse_remote_url(url: &str) -> Result<Project> {
    let hostname = extract_hostname(url)
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    if !is_supported_host(&hostname) {
        return Err(Error::NoSupportedRemotes);
    }

    let path = if url.contains("://") {
        RE_URL.captures(url)
    } else {
        RE_SCP.captures(url)
    }
    .and_then(|c| c.get(c.len() - 1))
    .map(|m| m.as_str())
    .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    let mut parts = path.split('/');
    let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::Parse(format!("invalid repo path: {path}")));
    };

    // ssh.github.com is an alias for the main host
    let host = if hostname.to_ascii_lowercase().ends_with(".github.com") {
        GITHUB_HOST.to_string()
    } else {
        hostname.to_ascii_lowercase()
    };

    Ok(Project::new(host, owner, name))
}

fn extract_hostname(url: &str) -> Option<String> {
    if url.contains("://") {
        return url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(ToString::to_string));
    }

    RE_SCP
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
