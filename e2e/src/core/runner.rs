//! Playwright invocation
//!
//! `playwright test` with the sequencer flags filtered out, the interactive
//! `playwright codegen` recorder with its saved-session fallback, and the
//! browser dependency install.

use std::path::Path;
use std::sync::Arc;

use shared::logging::log_success;
use shared::{Stage, stage_error, stage_info, stage_warn};

use crate::config::SequencerConfig;
use crate::core::args::filter_forwarded_args;
use crate::error::{E2eError, E2eResult};
use crate::traits::CommandRunner;
use crate::types::{CommandOutcome, ProcessSpec};

/// Marker Playwright prints when a storage state file cannot be loaded
const AUTH_ARTIFACT_MARKER: &str = "auth.json";

pub struct TestRunner {
    runner: Arc<dyn CommandRunner>,
}

impl TestRunner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn playwright(config: &SequencerConfig) -> ProcessSpec {
        ProcessSpec::from_command_line(&config.toolchain.npx_command)
            .arg("playwright")
            .envs(config.runner_env())
    }

    /// `npx playwright test <args>` with sequencer-only flags removed
    pub fn test_spec(config: &SequencerConfig, extra_args: &[String]) -> ProcessSpec {
        Self::playwright(config)
            .arg("test")
            .args(filter_forwarded_args(extra_args))
    }

    /// `npx playwright codegen`, optionally loading the saved session
    pub fn codegen_spec(config: &SequencerConfig, load_saved_session: bool) -> ProcessSpec {
        let auth = config.toolchain.auth_state_path.display().to_string();
        let mut spec = Self::playwright(config).arg("codegen");
        if load_saved_session {
            spec = spec.arg(format!("--load-storage={auth}"));
        }
        spec.arg(&config.target.base_url)
            .arg(format!("--save-storage={auth}"))
            .capture_stderr()
    }

    pub fn install_deps_spec(config: &SequencerConfig) -> ProcessSpec {
        Self::playwright(config).args(["install", "--with-deps"])
    }

    /// Run the test suite and hand back its real exit status
    ///
    /// A failing suite is not an error here; the caller propagates the code.
    pub async fn invoke(&self, config: &SequencerConfig, extra_args: &[String]) -> E2eResult<CommandOutcome> {
        let spec = Self::test_spec(config, extra_args);
        stage_info!(Stage::Runner, "🧪 {}", spec.display_command());

        let outcome = self.runner.run(&spec).await?;
        if outcome.success() {
            log_success(Stage::Runner, "Test run passed");
        } else {
            stage_warn!(Stage::Runner, "Test run finished with exit code {}", outcome.exit_code());
        }
        Ok(outcome)
    }

    /// Record a test script, reusing the saved session when it is usable
    ///
    /// A missing session file goes straight to a fresh recording. A run that
    /// fails while loading the session is retried once without it; any other
    /// failure is reported and not retried.
    pub async fn codegen(&self, config: &SequencerConfig) -> E2eResult<CommandOutcome> {
        let auth = &config.toolchain.auth_state_path;

        if tokio::fs::try_exists(auth).await.unwrap_or(false) {
            let outcome = self.runner.run(&Self::codegen_spec(config, true)).await?;
            if outcome.success() {
                return Ok(outcome);
            }
            if !mentions_auth_artifact(&outcome.stderr, auth) {
                let err = E2eError::ToolFailed {
                    command: Self::codegen_spec(config, true).display_command(),
                    code: outcome.code,
                };
                stage_error!(Stage::Runner, "❌ {}", err);
                return Err(err);
            }
            let stale = E2eError::AuthArtifactStale { path: auth.clone() };
            stage_warn!(Stage::Runner, "{}, recording a fresh session", stale);
        } else {
            stage_info!(
                Stage::Runner,
                "No saved session at {}, recording a fresh one",
                auth.display()
            );
        }

        if let Some(parent) = auth.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let spec = Self::codegen_spec(config, false);
        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            let err = E2eError::ToolFailed {
                command: spec.display_command(),
                code: outcome.code,
            };
            stage_error!(Stage::Runner, "❌ {}", err);
            return Err(err);
        }
        Ok(outcome)
    }

    /// `npx playwright install --with-deps`
    pub async fn install_deps(&self, config: &SequencerConfig) -> E2eResult<CommandOutcome> {
        let spec = Self::install_deps_spec(config);
        stage_info!(Stage::Runner, "📦 {}", spec.display_command());

        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            return Err(E2eError::ToolFailed {
                command: spec.display_command(),
                code: outcome.code,
            });
        }
        Ok(outcome)
    }
}

/// Whether a failed run's stderr points at the saved session file
fn mentions_auth_artifact(stderr: &str, auth: &Path) -> bool {
    let file_name = auth.file_name().map(|n| n.to_string_lossy().into_owned());
    match file_name {
        Some(name) if stderr.contains(&name) => true,
        _ => stderr.contains(AUTH_ARTIFACT_MARKER),
    }
}
