//! E2E readiness sequencer
//!
//! Makes sure the app is installed and running, waits until both the backend
//! health check and the UI bundle report ready, then hands off to Playwright
//! (or its code generator).
//!
//! All side effects sit behind the traits in [`traits`]; [`services`] holds
//! the real implementations and [`Sequencer`] wires them together.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod sequencer;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{PollSettings, SequencerConfig, SequencerConfigBuilder, TargetConfig, ToolchainConfig};
pub use crate::core::{AppLauncher, ReadinessPoller, TestRunner, filter_forwarded_args};
pub use error::{E2eError, E2eResult};
pub use sequencer::Sequencer;
pub use traits::{CommandRunner, PortProbe, ReadinessProbe, RunningProcess};
pub use types::{CommandOutcome, LaunchOutcome, ProcessSpec};
