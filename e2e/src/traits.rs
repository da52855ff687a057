//! Trait definitions with mockall annotations for testing
//!
//! Every side effect the sequencer performs (spawning processes, probing the
//! app port, probing readiness endpoints) goes through one of these traits so
//! the launcher, poller and runner can be driven by mocks.

use std::time::Duration;

use async_trait::async_trait;
use shared::CheckKind;

use crate::error::E2eResult;
use crate::types::{CommandOutcome, ProcessSpec};

/// Child process execution
#[mockall::automock]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and report how it exited
    ///
    /// A non-zero exit is an `Ok` outcome; only failing to start the
    /// process is an error.
    async fn run(&self, spec: &ProcessSpec) -> E2eResult<CommandOutcome>;

    /// Start a long-running command and hand back its handle
    async fn spawn(&self, spec: &ProcessSpec) -> E2eResult<Box<dyn RunningProcess>>;
}

/// Handle to a spawned long-running process
#[mockall::automock]
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if the process is still known to the OS
    fn id(&self) -> Option<u32>;

    /// Wait for the process to exit on its own
    async fn wait(&mut self) -> E2eResult<CommandOutcome>;

    /// Ask the process to stop, killing it if it is still alive after `grace`
    async fn terminate(&mut self, grace: Duration) -> E2eResult<()>;
}

/// TCP reachability of the app port
#[mockall::automock]
#[async_trait]
pub trait PortProbe: Send + Sync {
    /// `Ok(true)` when something accepts connections on `port`
    async fn is_reachable(&self, port: u16) -> E2eResult<bool>;
}

/// One readiness probe against the running app
#[mockall::automock]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// `Ok(true)` when the signal for `check` reports ready, `Ok(false)` when
    /// the endpoint answered but is not ready yet
    ///
    /// Network failures come back as `E2eError::TransientProbe`.
    async fn probe(&self, check: CheckKind) -> E2eResult<bool>;
}
