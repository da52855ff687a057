//! Process descriptions and outcomes exchanged between the sequencer and its services

use shared::IoMode;

/// Everything needed to start one child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    pub io_mode: IoMode,
    /// Extra environment variables layered over the inherited environment
    pub env: Vec<(String, String)>,
    /// Tee stderr to the console while keeping a copy in the outcome
    pub capture_stderr: bool,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            io_mode: IoMode::Inherited,
            env: Vec::new(),
            capture_stderr: false,
        }
    }

    /// Split a configured command such as `yarn nocobase` into program and leading args
    pub fn from_command_line(command: &str) -> Self {
        let mut words = command.split_whitespace();
        let program = words.next().unwrap_or_default();
        Self::new(program).args(words)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn io_mode(mut self, io_mode: IoMode) -> Self {
        self.io_mode = io_mode;
        self
    }

    pub fn envs<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.env.extend(vars);
        self
    }

    pub fn capture_stderr(mut self) -> Self {
        self.capture_stderr = true;
        self
    }

    /// Command line as it would be typed in a shell, for logs and errors
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_arg(&self, arg: &str) -> bool {
        self.args.iter().any(|a| a == arg)
    }
}

/// Result of a child process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Captured stderr tail (empty unless capture was requested)
    pub stderr: String,
}

impl CommandOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code to report for this outcome; signals map to 1
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// What `ensure_running` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Something already listens on the app port, nothing was spawned
    AlreadyRunning,
    /// A new server process was spawned
    Spawned { pid: Option<u32> },
}
