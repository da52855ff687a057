//! Readiness polling
//!
//! Each check is a plain async loop: give up once the attempt ceiling is
//! reached, otherwise sleep one interval, probe, and stop on the first ready
//! answer. Probe errors only cost a tick.

use std::sync::Arc;
use std::time::Duration;

use shared::logging::log_success;
use shared::{CheckKind, Stage, stage_debug, stage_info, stage_warn};
use tokio::time::sleep;

use crate::config::PollSettings;
use crate::error::{E2eError, E2eResult};
use crate::traits::ReadinessProbe;

/// Lifecycle of a single readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Polling,
    Succeeded,
    TimedOut,
}

/// Bookkeeping for one in-flight check
#[derive(Debug, Clone)]
pub struct ReadinessCheck {
    pub kind: CheckKind,
    pub interval: Duration,
    pub max_attempts: u32,
    attempts: u32,
    state: CheckState,
}

impl ReadinessCheck {
    pub fn new(kind: CheckKind, settings: &PollSettings) -> Self {
        Self {
            kind,
            interval: settings.interval,
            max_attempts: settings.max_attempts,
            attempts: 0,
            state: CheckState::Polling,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    /// Claim the next attempt, or move to `TimedOut` once the ceiling is hit
    fn begin_attempt(&mut self) -> bool {
        if self.attempts >= self.max_attempts {
            self.state = CheckState::TimedOut;
            return false;
        }
        self.attempts += 1;
        true
    }

    fn succeed(&mut self) {
        self.state = CheckState::Succeeded;
    }
}

/// Polls the server and UI readiness signals in order
pub struct ReadinessPoller {
    probe: Arc<dyn ReadinessProbe>,
    settings: PollSettings,
}

impl ReadinessPoller {
    pub fn new(probe: Arc<dyn ReadinessProbe>, settings: PollSettings) -> Self {
        Self { probe, settings }
    }

    /// Poll `kind` until it reports ready or the attempt ceiling is reached
    ///
    /// Returns the number of probes it took.
    pub async fn wait_for(&self, kind: CheckKind) -> E2eResult<u32> {
        let mut check = ReadinessCheck::new(kind, &self.settings);

        while check.begin_attempt() {
            sleep(check.interval).await;

            match self.probe.probe(kind).await {
                Ok(true) => {
                    check.succeed();
                    stage_debug!(Stage::Poller, attempts = check.attempts(), "{} check passed", kind);
                    return Ok(check.attempts());
                }
                Ok(false) => {
                    stage_debug!(Stage::Poller, attempt = check.attempts(), "{} not ready yet", kind);
                }
                Err(e) if e.is_transient() => {
                    stage_warn!(Stage::Poller, attempt = check.attempts(), "Request error: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        debug_assert_eq!(check.state(), CheckState::TimedOut);
        Err(E2eError::StartupTimeout {
            check: kind,
            attempts: check.attempts(),
        })
    }

    pub async fn wait_for_server(&self) -> E2eResult<()> {
        self.wait_for(CheckKind::Server).await.map(|_| ())
    }

    pub async fn wait_for_ui(&self) -> E2eResult<()> {
        self.wait_for(CheckKind::Ui).await.map(|_| ())
    }

    /// Server first; the bundle status only means something once the server answers
    pub async fn wait_until_ready(&self) -> E2eResult<()> {
        stage_debug!(
            Stage::Poller,
            "Polling every {:?}, giving up after {:?} per check",
            self.settings.interval,
            self.settings.budget()
        );
        stage_info!(Stage::Poller, "⏳ check server...");
        self.wait_for_server().await?;
        stage_info!(Stage::Poller, "server is ready, check UI...");
        self.wait_for_ui().await?;
        log_success(Stage::Poller, "UI is ready.");
        Ok(())
    }
}
