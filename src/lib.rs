//! prflow - open GitHub pull requests from a git checkout
//!
//! This library turns local repository state (current branch, upstream
//! tracking, unpushed commits) plus user options into a pull request on
//! GitHub, then applies labels, assignees, milestone and reviewers.
//!
//! # Architecture
//!
//! The submission workflow runs four stages in order:
//! - reference resolution ([`submit::resolve_refs`])
//! - message assembly ([`submit::assemble_message`])
//! - creation with push/visibility retries ([`submit::Submitter`])
//! - metadata application ([`submit::apply_metadata`])
//!
//! Git, the hosting service, the text editor and the clock are reached
//! through traits so the workflow can run against mocks.

pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod platform;
pub mod repo;
pub mod submit;
pub mod types;

pub use error::{Error, ErrorKind, Result};
pub use types::*;
