//! Shared test utilities

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_platform;
pub mod mock_repo;

pub use fixtures::*;
pub use mock_platform::MockPlatformService;
pub use mock_repo::{Event, ManualClock, MockRepository, RecordingProgress, ScriptedEditor};
