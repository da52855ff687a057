//! Core sequencing logic
//!
//! Every side effect goes through the traits in [`crate::traits`], so each
//! stage here can be driven entirely by mocks.

pub mod args;
pub mod launcher;
pub mod readiness;
pub mod runner;

pub use args::{extract_url, filter_forwarded_args, has_skip_reporter};
pub use launcher::{AppLauncher, SHUTDOWN_GRACE};
pub use readiness::{CheckState, ReadinessCheck, ReadinessPoller};
pub use runner::TestRunner;
