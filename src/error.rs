//! Error types for prflow

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The submission was refused before anything was sent
    UserAbort,
    /// Local repository state could not be mapped to a remote
    Resolution,
    /// Hosting service error that may clear up on its own
    TransientApi,
    /// Hosting service error that will not be retried
    PermanentApi,
    /// A named remote object does not exist
    NotFound,
    /// Git, filesystem, auth or configuration problem
    Environment,
}

/// prflow errors
#[derive(Debug, Error)]
pub enum Error {
    /// Base and head resolve to the same branch of the same project
    #[error(
        "Aborted: head branch is the same as base (\"{0}\")\n(use `-h <branch>` to specify an explicit pull request head)"
    )]
    AmbiguousRef(String),

    /// No base branch given and none could be inferred
    #[error(
        "Aborted: unable to determine the base branch\n(use `-b <branch>` to specify an explicit pull request base)"
    )]
    NoBaseBranch,

    /// The current branch has commits its upstream doesn't have
    #[error(
        "Aborted: {count} commits are not yet pushed to {tracking}\n(use `-f` to force submit a pull request anyway)"
    )]
    UnpushedCommits {
        /// Number of unpushed commits
        count: usize,
        /// Upstream as `<remote>/<branch>`
        tracking: String,
    },

    /// `--no-edit` found nothing to take a message from
    #[error("Aborted: no commits detected between {base} and {head}")]
    NoCommitsFound {
        /// Base revision
        base: String,
        /// Head revision
        head: String,
    },

    /// Title is blank and no issue is being converted
    #[error("Aborting due to empty pull request title")]
    EmptyTitle,

    /// Editor was closed without saving
    #[error("Aborted: the pull request message was not saved")]
    EditAborted,

    /// Push-first was requested but no remote matches the head project
    #[error("Can't find remote for {0}")]
    NoRemoteForHead(String),

    /// No remote points at a supported host
    #[error("no GitHub remotes found")]
    NoSupportedRemotes,

    /// Named remote not configured
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Creation rejected because the head ref isn't visible to the API yet
    #[error("Invalid value for \"head\": {0}")]
    InvalidHead(String),

    /// Transient failures persisted past the retry allowance
    ///
    /// Still a transient failure by kind, but never retried again.
    #[error("{source}\nGiven up after retrying {retries} times over {elapsed_secs:.1} seconds.")]
    RetriesExhausted {
        /// Last error returned by the hosting service
        #[source]
        source: Box<Error>,
        /// Wall time since the first attempt
        elapsed_secs: f64,
        /// Number of retries performed
        retries: u32,
    },

    /// Milestone title not found in the project
    #[error("no milestone found with name '{0}'")]
    MilestoneNotFound(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error
    #[error("platform error: {0}")]
    Platform(String),

    /// Git command failed
    #[error("git error: {0}")]
    Git(String),

    /// Authentication error
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),

    /// Text editor could not be run
    #[error("editor error: {0}")]
    Editor(String),

    /// Browser or clipboard helper could not be run
    #[error("{0}")]
    Presentation(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AmbiguousRef(_)
            | Self::NoBaseBranch
            | Self::UnpushedCommits { .. }
            | Self::NoCommitsFound { .. }
            | Self::EmptyTitle
            | Self::EditAborted => ErrorKind::UserAbort,
            Self::NoRemoteForHead(_) | Self::NoSupportedRemotes | Self::RemoteNotFound(_) => {
                ErrorKind::Resolution
            }
            Self::InvalidHead(_) | Self::RetriesExhausted { .. } => ErrorKind::TransientApi,
            Self::GitHubApi(_) | Self::Platform(_) => ErrorKind::PermanentApi,
            Self::MilestoneNotFound(_) => ErrorKind::NotFound,
            Self::Git(_)
            | Self::Auth(_)
            | Self::Config(_)
            | Self::Parse(_)
            | Self::Editor(_)
            | Self::Presentation(_)
            | Self::Io(_) => ErrorKind::Environment,
        }
    }

    /// Whether the create call may succeed if repeated shortly
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::InvalidHead(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message.clone()),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_abort_messages_carry_remedy() {
        let err = Error::UnpushedCommits {
            count: 2,
            tracking: "refs/remotes/origin/feature".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UserAbort);
        assert!(err.to_string().contains("use `-f`"));

        let err = Error::AmbiguousRef("main".to_string());
        assert_eq!(err.kind(), ErrorKind::UserAbort);
        assert!(err.to_string().contains("-h <branch>"));
    }

    #[test]
    fn test_only_invalid_head_is_transient() {
        assert!(Error::InvalidHead("x".into()).is_transient());
        assert!(!Error::GitHubApi("x".into()).is_transient());
        assert!(!Error::MilestoneNotFound("v1".into()).is_transient());
    }

    #[test]
    fn test_retries_exhausted_wraps_source() {
        let err = Error::RetriesExhausted {
            source: Box::new(Error::InvalidHead("no such ref".into())),
            elapsed_secs: 9.0,
            retries: 3,
        };
        assert_eq!(err.kind(), ErrorKind::TransientApi);
        assert!(!err.is_transient());
        insta::assert_snapshot!(err.to_string(), @r#"
        Invalid value for "head": no such ref
        Given up after retrying 3 times over 9.0 seconds.
        "#);
    }

    #[test]
    fn test_empty_title_message() {
        insta::assert_snapshot!(
            Error::EmptyTitle.to_string(),
            @"Aborting due to empty pull request title"
        );
    }
}
