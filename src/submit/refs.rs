//! Phase 1: Reference resolution
//!
//! Works out which project and branch the pull request goes from and to.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::repo::{LocalRepository, main_project, project_for_remote, remote_for_project};
use crate::submit::PushTarget;
use crate::types::{Branch, GitRemote, Project};
use tracing::debug;

/// Explicit base/head given by the user
#[derive(Debug, Clone, Default)]
pub struct RefOptions {
    /// `[owner[/name]:]branch` to merge into
    pub base: Option<String>,
    /// `[owner[/name]:]branch` to merge from
    pub head: Option<String>,
    /// Push the head before creating
    pub push: bool,
}

/// Base and head, fully resolved
#[derive(Debug, Clone)]
pub struct ResolvedRefs {
    /// Project the PR targets
    pub base_project: Project,
    /// Branch to merge into
    pub base_ref: String,
    /// Project holding the head branch
    pub head_project: Project,
    /// Branch to merge from
    pub head_ref: String,
    /// Remote branch the current branch tracks (local tracking is dropped)
    pub tracking: Option<Branch>,
    /// Base as a local revision (`<remote>/<base>` when the remote exists)
    pub base_tracking: String,
    /// Head as a local revision (`<remote>/<head>` when the remote exists)
    pub head_tracking: String,
    /// Remote the head lives on
    pub push_remote: Option<GitRemote>,
}

impl ResolvedRefs {
    /// `owner:base`
    pub fn qualified_base(&self) -> String {
        self.base_project.qualify(&self.base_ref)
    }

    /// `owner:head`
    pub fn qualified_head(&self) -> String {
        self.head_project.qualify(&self.head_ref)
    }

    /// Where to push the head, if a remote for it exists
    pub fn push_target(&self) -> Option<PushTarget> {
        self.push_remote.as_ref().map(|remote| PushTarget {
            remote: remote.name.clone(),
            head: self.head_ref.clone(),
        })
    }
}

/// Parse `[owner[/name]:]ref` relative to `context`
///
/// An owner-only prefix keeps the context repository name; the host is
/// always inherited.
pub fn parse_ref(context: &Project, raw: &str) -> (Project, String) {
    let Some((prefix, git_ref)) = raw.split_once(':') else {
        return (context.clone(), raw.to_string());
    };

    let project = match prefix.split_once('/') {
        Some((owner, name)) => Project::new(context.host.clone(), owner, name),
        None => Project::new(context.host.clone(), prefix, context.name.clone()),
    };

    (project, git_ref.to_string())
}

/// Head branch name when none was given
///
/// Uses the tracked branch only when it is a remote branch.
pub fn default_head(current: &Branch, tracking: Option<&Branch>) -> String {
    match tracking {
        Some(t) if t.is_remote() => t.short_name.clone(),
        _ => current.short_name.clone(),
    }
}

/// Resolve base and head from options and local repository state
pub async fn resolve_refs(
    repo: &dyn LocalRepository,
    platform: &dyn PlatformService,
    options: &RefOptions,
) -> Result<ResolvedRefs> {
    let current = repo.current_branch()?;
    let remotes = repo.remotes()?;

    let mut base_project = main_project(&remotes)?;
    let tracking = repo.tracking_branch(&current)?.filter(Branch::is_remote);
    let mut head_project = tracking
        .as_ref()
        .and_then(|t| t.remote.as_deref())
        .and_then(|name| project_for_remote(&remotes, name).ok())
        .unwrap_or_else(|| base_project.clone());

    let mut base = None;
    if let Some(raw) = options.base.as_deref() {
        let (project, git_ref) = parse_ref(&base_project, raw);
        base_project = project;
        base = Some(git_ref);
    }

    let mut head = None;
    if let Some(raw) = options.head.as_deref() {
        let (project, git_ref) = parse_ref(&head_project, raw);
        head_project = project;
        head = Some(git_ref);
    }

    let base_remote = remote_for_project(&remotes, &base_project).cloned();
    let base_ref = match (base, &base_remote) {
        (Some(base), _) => base,
        (None, Some(remote)) => repo.default_branch(&remote.name)?,
        (None, None) => return Err(Error::NoBaseBranch),
    };

    let head_ref = head.unwrap_or_else(|| default_head(&current, tracking.as_ref()));

    if base_project == head_project && base_ref == head_ref {
        return Err(Error::AmbiguousRef(base_ref));
    }

    match platform.repository(&head_project).await {
        Ok(canonical) => {
            head_project.owner = canonical.owner;
            head_project.name = canonical.name;
        }
        Err(e) => debug!(project = %head_project, error = %e, "keeping local head project"),
    }

    let base_tracking = base_remote
        .as_ref()
        .map_or_else(|| base_ref.clone(), |r| format!("{}/{base_ref}", r.name));

    let push_remote = match &base_remote {
        Some(remote) if base_project == head_project => Some(remote.clone()),
        _ => remote_for_project(&remotes, &head_project).cloned(),
    };

    let head_tracking = push_remote
        .as_ref()
        .map_or_else(|| head_ref.clone(), |r| format!("{}/{head_ref}", r.name));

    if options.push && push_remote.is_none() {
        return Err(Error::NoRemoteForHead(head_ref));
    }

    debug!(
        base = %base_project.qualify(&base_ref),
        head = %head_project.qualify(&head_ref),
        %base_tracking,
        %head_tracking,
        "resolved refs"
    );

    Ok(ResolvedRefs {
        base_project,
        base_ref,
        head_project,
        head_ref,
        tracking,
        base_tracking,
        head_tracking,
        push_remote,
    })
}
