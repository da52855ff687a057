//! Configuration Management
//!
//! Everything the sequencer reads from the environment and the command line,
//! resolved once into a [`SequencerConfig`] before any stage runs.

pub mod builder;
pub mod poll;
pub mod target;
pub mod toolchain;

pub use builder::SequencerConfigBuilder;
pub use poll::PollSettings;
pub use target::{TargetConfig, normalize_base_url};
pub use toolchain::ToolchainConfig;

/// Variable that tells the Playwright config to drop its reporters
pub const ENV_SKIP_REPORTER: &str = "PLAYWRIGHT_SKIP_REPORTER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerConfig {
    pub target: TargetConfig,
    pub poll: PollSettings,
    pub toolchain: ToolchainConfig,
    /// Launch the app before polling; false when an external `--url` is given
    pub manage_app: bool,
    pub skip_reporter: bool,
}

impl SequencerConfig {
    pub fn builder() -> SequencerConfigBuilder {
        SequencerConfigBuilder::new()
    }

    /// Environment for Playwright children: the target plus the reporter switch
    pub fn runner_env(&self) -> Vec<(String, String)> {
        let mut env = self.target.child_env();
        if self.skip_reporter {
            env.push((ENV_SKIP_REPORTER.to_string(), "true".to_string()));
        }
        env
    }
}
