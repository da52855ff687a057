//! Real child process service implementation
//!
//! Runs tool commands to completion and spawns the long-running app server,
//! with stdio either inherited from the sequencer or discarded.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::task::JoinHandle;

use shared::{IoMode, Stage, stage_debug, stage_warn};

use crate::error::{E2eError, E2eResult};
use crate::traits::{CommandRunner, RunningProcess};
use crate::types::{CommandOutcome, ProcessSpec};

/// Lines of stderr kept when a command asks for capture
const STDERR_TAIL_LINES: usize = 200;

/// Real command runner backed by `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &ProcessSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        match spec.io_mode {
            IoMode::Inherited => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            IoMode::Silenced => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }
        if spec.capture_stderr {
            cmd.stderr(Stdio::piped());
        }
        cmd
    }

    fn spawn_child(spec: &ProcessSpec, cmd: &mut Command) -> E2eResult<Child> {
        cmd.spawn().map_err(|source| E2eError::Spawn {
            program: spec.program.clone(),
            source,
        })
    }
}

/// Forward piped stderr line by line, keeping a bounded tail of it
///
/// Reads until EOF so the child never sees a closed pipe; bytes that are not
/// UTF-8 are replaced rather than ending the copy.
fn spawn_stderr_tee(stderr: ChildStderr, echo: bool) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stderr);
        let mut buf = Vec::new();
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

        while matches!(reader.read_until(b'\n', &mut buf).await, Ok(n) if n > 0) {
            let line = String::from_utf8_lossy(&buf)
                .trim_end_matches(['\n', '\r'])
                .to_string();
            buf.clear();
            if echo {
                eprintln!("{line}");
            }
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        Vec::from(tail).join("\n")
    })
}

fn outcome(status: ExitStatus) -> CommandOutcome {
    CommandOutcome {
        code: status.code(),
        stderr: String::new(),
    }
}

#[async_trait]
impl CommandRunner for RealCommandRunner {
    async fn run(&self, spec: &ProcessSpec) -> E2eResult<CommandOutcome> {
        stage_debug!(Stage::Sequencer, "Running `{}`", spec.display_command());

        let mut cmd = Self::command(spec);
        let mut child = Self::spawn_child(spec, &mut cmd)?;

        let tee = child
            .stderr
            .take()
            .map(|stderr| spawn_stderr_tee(stderr, spec.io_mode == IoMode::Inherited));

        let status = child.wait().await?;
        let mut result = outcome(status);

        if let Some(tee) = tee {
            match tee.await {
                Ok(tail) => result.stderr = tail,
                Err(e) => {
                    stage_warn!(Stage::Sequencer, "Lost stderr of `{}`: {}", spec.program, e);
                }
            }
        }

        stage_debug!(Stage::Sequencer, "`{}` exited with {:?}", spec.program, result.code);
        Ok(result)
    }

    async fn spawn(&self, spec: &ProcessSpec) -> E2eResult<Box<dyn RunningProcess>> {
        let mut cmd = Self::command(spec);
        cmd.kill_on_drop(true);
        // The app CLI forks the real server; give it a group we can signal as a whole
        #[cfg(unix)]
        cmd.process_group(0);
        let child = Self::spawn_child(spec, &mut cmd)?;

        Ok(Box::new(RealRunningProcess {
            program: spec.program.clone(),
            group: child.id(),
            child,
        }))
    }
}

/// A spawned server process
///
/// The child leads its own process group. Stopping it signals the whole group
/// so servers forked by the app CLI go down with it. The group is killed if
/// the handle is dropped while it is still running.
pub struct RealRunningProcess {
    program: String,
    /// Process group id, cleared once the group has been swept
    group: Option<u32>,
    child: Child,
}

impl RealRunningProcess {
    #[cfg(unix)]
    fn signal_group(&self, signal: nix::sys::signal::Signal) -> E2eResult<()> {
        use nix::errno::Errno;
        use nix::sys::signal::killpg;
        use nix::unistd::Pid;

        let Some(group) = self.group else {
            return Ok(());
        };
        match killpg(Pid::from_raw(group as i32), signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(std::io::Error::from(e).into()),
        }
    }

    #[cfg(unix)]
    fn send_sigterm(&self) -> E2eResult<()> {
        self.signal_group(nix::sys::signal::Signal::SIGTERM)
    }

    /// SIGKILL whatever is left in the group
    #[cfg(unix)]
    fn sweep_group(&mut self) {
        if let Err(e) = self.signal_group(nix::sys::signal::Signal::SIGKILL) {
            stage_warn!(Stage::Launcher, "Failed to clean up {} process group: {}", self.program, e);
        }
        self.group = None;
    }

    #[cfg(not(unix))]
    fn send_sigterm(&self) -> E2eResult<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    fn sweep_group(&mut self) {
        self.group = None;
    }
}

#[async_trait]
impl RunningProcess for RealRunningProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> E2eResult<CommandOutcome> {
        let status = self.child.wait().await?;
        Ok(outcome(status))
    }

    async fn terminate(&mut self, grace: Duration) -> E2eResult<()> {
        if self.child.try_wait()?.is_some() {
            self.sweep_group();
            return Ok(());
        }

        if let Err(e) = self.send_sigterm() {
            stage_warn!(Stage::Launcher, "⚠️ Failed to terminate {} gracefully: {}", self.program, e);
        }

        let result = match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                stage_debug!(Stage::Launcher, "{} terminated with {:?}", self.program, status.code());
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                stage_warn!(Stage::Launcher, "🔨 Force killing {}", self.program);
                self.child.kill().await.map_err(E2eError::from)
            }
        };
        self.sweep_group();
        result
    }
}

impl Drop for RealRunningProcess {
    fn drop(&mut self) {
        let running = matches!(self.child.try_wait(), Ok(None));
        if running {
            stage_warn!(Stage::Launcher, "🚨 Emergency cleanup: force killing {}", self.program);
        }
        self.sweep_group();
        if running {
            let _ = self.child.start_kill();
        }
    }
}
