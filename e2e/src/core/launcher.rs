//! App process launcher
//!
//! Installs the app, then starts a server unless one already answers on the
//! app port. The spawned server stays owned by the launcher until it exits,
//! is shut down, or the launcher is dropped.

use std::sync::Arc;
use std::time::Duration;

use shared::{IoMode, Stage, stage_debug, stage_info, stage_warn};

use crate::config::SequencerConfig;
use crate::error::{E2eError, E2eResult};
use crate::traits::{CommandRunner, PortProbe, RunningProcess};
use crate::types::{CommandOutcome, LaunchOutcome, ProcessSpec};

/// Time a server gets to exit after SIGTERM before it is killed
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub struct AppLauncher {
    runner: Arc<dyn CommandRunner>,
    ports: Arc<dyn PortProbe>,
    process: Option<Box<dyn RunningProcess>>,
}

impl AppLauncher {
    pub fn new(runner: Arc<dyn CommandRunner>, ports: Arc<dyn PortProbe>) -> Self {
        Self {
            runner,
            ports,
            process: None,
        }
    }

    /// `<app> install -f`, always with output on the console
    pub fn install_spec(config: &SequencerConfig) -> ProcessSpec {
        ProcessSpec::from_command_line(&config.toolchain.app_command)
            .args(["install", "-f"])
            .envs(config.target.child_env())
    }

    /// `<app> dev` or `<app> start` depending on the target environment
    pub fn server_spec(config: &SequencerConfig, io_mode: IoMode) -> ProcessSpec {
        ProcessSpec::from_command_line(&config.toolchain.app_command)
            .arg(config.target.environment.server_subcommand())
            .io_mode(io_mode)
            .envs(config.target.child_env())
    }

    /// Reinstall the app; a failing install aborts the sequence
    pub async fn install(&self, config: &SequencerConfig) -> E2eResult<()> {
        let spec = Self::install_spec(config);
        stage_info!(Stage::Launcher, "📦 installing...");

        let outcome = self.runner.run(&spec).await?;
        if !outcome.success() {
            return Err(E2eError::ToolFailed {
                command: spec.display_command(),
                code: outcome.code,
            });
        }
        Ok(())
    }

    /// Whether the app port accepts connections; probe errors count as "no"
    pub async fn is_app_reachable(&self, port: u16) -> bool {
        match self.ports.is_reachable(port).await {
            Ok(reachable) => reachable,
            Err(e) => {
                stage_warn!(Stage::Launcher, "Port {} check failed, assuming it is free: {}", port, e);
                false
            }
        }
    }

    /// Install, then start the server unless the port is already taken
    ///
    /// Does not wait for readiness.
    pub async fn ensure_running(&mut self, config: &SequencerConfig, io_mode: IoMode) -> E2eResult<LaunchOutcome> {
        self.install(config).await?;

        if self.is_app_reachable(config.target.port).await {
            stage_info!(Stage::Launcher, "app started");
            return Ok(LaunchOutcome::AlreadyRunning);
        }

        if self.process.is_some() {
            stage_warn!(Stage::Launcher, "Managed server is not listening yet, leaving it running");
            return Ok(LaunchOutcome::Spawned { pid: self.process_id() });
        }

        let spec = Self::server_spec(config, io_mode);
        stage_info!(Stage::Launcher, "🚀 starting... ({})", spec.display_command());

        let process = self.runner.spawn(&spec).await?;
        let pid = process.id();
        stage_debug!(Stage::Launcher, "Spawned app server (PID: {:?})", pid);
        self.process = Some(process);

        Ok(LaunchOutcome::Spawned { pid })
    }

    /// True while a server spawned by this launcher is being tracked
    pub fn is_managing(&self) -> bool {
        self.process.is_some()
    }

    pub fn process_id(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.id())
    }

    /// Block until the managed server exits; `None` if nothing was spawned
    ///
    /// Cancel-safe: the process stays tracked until it has actually exited.
    pub async fn wait(&mut self) -> E2eResult<Option<CommandOutcome>> {
        let Some(process) = self.process.as_mut() else {
            return Ok(None);
        };
        let outcome = process.wait().await?;
        self.process = None;
        stage_info!(Stage::Launcher, "🏁 App server exited with code {:?}", outcome.code);
        Ok(Some(outcome))
    }

    /// Stop the managed server, if any
    pub async fn shutdown(&mut self) -> E2eResult<()> {
        if let Some(mut process) = self.process.take() {
            stage_info!(Stage::Launcher, "🛑 Stopping app server (PID: {:?})", process.id());
            process.terminate(SHUTDOWN_GRACE).await?;
        }
        Ok(())
    }
}
