//! Environment configuration
//!
//! prflow has no config file; everything tunable comes from the
//! environment or the command line.

use crate::error::{Error, Result};
use std::env;

/// Maximum seconds to keep retrying creation after a push
pub const RETRY_TIMEOUT_ENV: &str = "PRFLOW_RETRY_TIMEOUT";

/// GitHub Enterprise host override
pub const GH_HOST_ENV: &str = "GH_HOST";

/// Log filter for the CLI (`tracing_subscriber::EnvFilter` syntax)
pub const LOG_ENV: &str = "PRFLOW_LOG";

/// Retry allowance used when [`RETRY_TIMEOUT_ENV`] is unset
pub const DEFAULT_RETRY_ALLOWANCE_SECS: u64 = 9;

/// Read the retry allowance from the environment
pub fn retry_allowance_from_env() -> Result<u64> {
    parse_retry_allowance(env::var(RETRY_TIMEOUT_ENV).ok().as_deref())
}

/// Parse a retry allowance value; `None` or blank yields the default
pub fn parse_retry_allowance(value: Option<&str>) -> Result<u64> {
    match value.map(str::trim) {
        None | Some("") => Ok(DEFAULT_RETRY_ALLOWANCE_SECS),
        Some(raw) => raw.parse().map_err(|_| {
            Error::Config(format!(
                "{RETRY_TIMEOUT_ENV} must be a non-negative number of seconds, got {raw:?}"
            ))
        }),
    }
}

/// GitHub host from `GH_HOST`, if set
pub fn github_host_from_env() -> Option<String> {
    env::var(GH_HOST_ENV).ok().filter(|h| !h.trim().is_empty())
}
