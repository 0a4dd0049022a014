//! GitHub authentication

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;
use tracing::debug;

const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication for `host`
///
/// Priority:
/// 1. gh CLI (`gh auth token --hostname <host>`)
/// 2. `GITHUB_TOKEN` environment variable
/// 3. `GH_TOKEN` environment variable
pub async fn get_github_auth(host: &str) -> Result<GitHubAuthConfig> {
    if let Some(token) = get_gh_cli_token(host).await {
        debug!(host, "using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    if let Some((var, token)) = env_token() {
        debug!(host, var, "using token from environment");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        });
    }

    Err(Error::Auth(format!(
        "No GitHub authentication found for {host}. Run `gh auth login` or set GITHUB_TOKEN"
    )))
}

/// First non-blank token among the supported environment variables
fn env_token() -> Option<(&'static str, String)> {
    TOKEN_VARS.iter().find_map(|&var| {
        env::var(var)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|t| (var, t))
    })
}

async fn get_gh_cli_token(host: &str) -> Option<String> {
    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
