//! Readiness sequencer
//!
//! Wires the launcher, poller and runner together for each subcommand. The
//! order is fixed: launch (unless targeting an external app), server ready,
//! UI ready, then hand off to Playwright.

use std::sync::Arc;

use shared::{IoMode, Stage, stage_info, stage_warn};

use crate::config::SequencerConfig;
use crate::core::{AppLauncher, ReadinessPoller, TestRunner};
use crate::error::{E2eError, E2eResult};
use crate::services::{HttpReadinessProbe, RealCommandRunner, TcpPortProbe};
use crate::traits::{CommandRunner, PortProbe, ReadinessProbe};
use crate::types::{CommandOutcome, LaunchOutcome};

pub struct Sequencer {
    config: SequencerConfig,
    launcher: AppLauncher,
    poller: ReadinessPoller,
    runner: TestRunner,
}

impl Sequencer {
    /// Create a sequencer with injected services
    pub fn new(
        config: SequencerConfig,
        commands: Arc<dyn CommandRunner>,
        ports: Arc<dyn PortProbe>,
        probe: Arc<dyn ReadinessProbe>,
    ) -> Self {
        let poller = ReadinessPoller::new(probe, config.poll);
        Self {
            launcher: AppLauncher::new(commands.clone(), ports),
            runner: TestRunner::new(commands),
            poller,
            config,
        }
    }

    /// Create a sequencer backed by real processes, sockets and HTTP
    pub fn with_real_services(config: SequencerConfig) -> E2eResult<Self> {
        let probe = HttpReadinessProbe::new(config.target.clone(), config.poll.probe_timeout)?;
        Ok(Self::new(
            config,
            Arc::new(RealCommandRunner::new()),
            Arc::new(TcpPortProbe::new()),
            Arc::new(probe),
        ))
    }

    /// Launch the app if it is ours to manage, then wait for server and UI
    async fn prepare(&mut self) -> E2eResult<()> {
        if self.config.manage_app {
            self.launcher.ensure_running(&self.config, IoMode::Silenced).await?;
        } else {
            stage_info!(Stage::Sequencer, "Using running app at {}", self.config.target.base_url);
        }
        self.poller.wait_until_ready().await
    }

    /// Stop whatever this sequencer spawned; failures are only logged
    async fn finish(&mut self) {
        if let Err(e) = self.launcher.shutdown().await {
            stage_warn!(Stage::Sequencer, "Failed to stop app server: {}", e);
        }
    }

    /// `test`: launch, wait for readiness, run Playwright
    ///
    /// The test run's own exit status comes back as `Ok`, pass or fail.
    pub async fn run_tests(&mut self, extra_args: &[String]) -> E2eResult<CommandOutcome> {
        let result = match self.prepare().await {
            Ok(()) => self.runner.invoke(&self.config, extra_args).await,
            Err(e) => Err(e),
        };
        self.finish().await;
        result
    }

    /// `codegen`: launch, wait for readiness, open the recorder
    pub async fn run_codegen(&mut self) -> E2eResult<CommandOutcome> {
        let result = match self.prepare().await {
            Ok(()) => self.runner.codegen(&self.config).await,
            Err(e) => Err(e),
        };
        self.finish().await;
        result
    }

    /// `start-app`: install and start the app in the foreground
    ///
    /// Returns immediately when something already listens on the app port.
    /// Otherwise blocks until the server exits or Ctrl+C is pressed.
    pub async fn start_app(&mut self) -> E2eResult<CommandOutcome> {
        let launch = self.launcher.ensure_running(&self.config, IoMode::Inherited).await?;
        if launch == LaunchOutcome::AlreadyRunning {
            return Ok(CommandOutcome::exited(0));
        }

        let exited = tokio::select! {
            outcome = self.launcher.wait() => Some(outcome?),
            _ = tokio::signal::ctrl_c() => None,
        };

        match exited {
            Some(Some(outcome)) if !outcome.success() => Err(E2eError::ToolFailed {
                command: AppLauncher::server_spec(&self.config, IoMode::Inherited).display_command(),
                code: outcome.code,
            }),
            Some(outcome) => Ok(outcome.unwrap_or_default()),
            None => {
                stage_info!(Stage::Sequencer, "Interrupted, stopping app server");
                self.finish().await;
                Ok(CommandOutcome::exited(0))
            }
        }
    }

    /// `reinstall-app`: `<app> install -f`
    pub async fn reinstall_app(&self) -> E2eResult<()> {
        self.launcher.install(&self.config).await
    }

    /// `install-deps`: Playwright browsers and their system dependencies
    pub async fn install_deps(&self) -> E2eResult<CommandOutcome> {
        self.runner.install_deps(&self.config).await
    }
}
