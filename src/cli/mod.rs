//! CLI commands
//!
//! Command implementations for the `prflow` binary.

mod output;
mod progress;
mod style;
mod submit;

pub use output::Presentation;
pub use submit::run_submit;
