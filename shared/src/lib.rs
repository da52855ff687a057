//! Shared types for the e2e readiness sequencer
//!
//! Vocabulary types, error types and logging helpers used by the
//! sequencer stages (launcher, poller, runner).

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
