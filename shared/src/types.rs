//! Core shared types and identifiers

use std::fmt;

/// Stage of the readiness sequence emitting a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Top-level command dispatch
    Sequencer,
    /// Install and app process management
    Launcher,
    /// Health check and bundle status polling
    Poller,
    /// Playwright invocation (test, codegen, install)
    Runner,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Sequencer => write!(f, "sequencer"),
            Stage::Launcher => write!(f, "launcher"),
            Stage::Poller => write!(f, "poller"),
            Stage::Runner => write!(f, "runner"),
        }
    }
}

/// Environment the application is started in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    /// Dev server with hot bundling (`dev`)
    #[default]
    Development,
    /// Prebuilt production server (`start`)
    Production,
}

impl AppEnvironment {
    /// Parse the `APP_ENV` value; only `production` selects production mode
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("production") => AppEnvironment::Production,
            _ => AppEnvironment::Development,
        }
    }

    /// Subcommand of the app CLI that starts the server in this mode
    pub fn server_subcommand(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "dev",
            AppEnvironment::Production => "start",
        }
    }

    pub fn as_env_value(&self) -> &'static str {
        match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_env_value())
    }
}

/// Kind of readiness signal polled before running tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Backend health check endpoint
    Server,
    /// Front-end bundle status endpoint
    Ui,
}

impl CheckKind {
    /// Path of the endpoint probed for this check, relative to the base URL
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            CheckKind::Server => "/api/__health_check",
            CheckKind::Ui => "/__umi/api/bundle-status",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Server => write!(f, "Server"),
            CheckKind::Ui => write!(f, "UI"),
        }
    }
}

/// Where a child process sends its standard streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    /// Streams are attached to this console
    #[default]
    Inherited,
    /// Streams are discarded
    Silenced,
}
