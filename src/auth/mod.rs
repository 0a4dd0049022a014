//! Authentication for GitHub
//!
//! Supports CLI-based auth (gh) and environment variables. Tokens are only
//! read, never stored.

mod github;

pub use github::{get_github_auth, GitHubAuthConfig};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the gh CLI
    Cli,
    /// Token from environment variable
    EnvVar,
}
