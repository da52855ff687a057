//! Command line interface
//!
//! `test` accepts arbitrary Playwright flags. Once clap meets the first flag
//! it does not know, everything after it (including `--url` and
//! `--skip-reporter`) lands in the passthrough list, so those two are looked
//! up there as well.

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use shared::SharedResult;

use crate::config::{SequencerConfig, SequencerConfigBuilder};
use crate::core::{extract_url, has_skip_reporter};

/// Launches the app, waits for server and UI readiness, then runs Playwright
#[derive(Parser, Debug)]
#[command(name = "e2e")]
#[command(about = "Launches the app, waits until it is ready, then runs Playwright")]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Milliseconds between readiness probes
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Probes per readiness check before giving up
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Playwright suite against a ready app
    Test(TestArgs),
    /// Record a new test with the Playwright code generator
    Codegen(CodegenArgs),
    /// Install and start the app in the foreground
    StartApp(StartAppArgs),
    /// Reinstall the app (`install -f`)
    ReinstallApp,
    /// Install Playwright browsers and their system dependencies
    InstallDeps,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Test(_) => "test",
            Commands::Codegen(_) => "codegen",
            Commands::StartApp(_) => "start-app",
            Commands::ReinstallApp => "reinstall-app",
            Commands::InstallDeps => "install-deps",
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct TestArgs {
    /// Test an app that is already running at this URL instead of launching one
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub url: Option<String>,

    /// Tell the Playwright config to skip its reporters
    #[arg(long)]
    pub skip_reporter: bool,

    /// Arguments forwarded to `playwright test`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub playwright_args: Vec<String>,
}

impl TestArgs {
    /// External app URL, from the flag or the passthrough list (last one wins)
    pub fn target_url(&self) -> Option<String> {
        extract_url(&self.playwright_args)
            .or_else(|| self.url.clone())
            .filter(|url| !url.is_empty())
    }

    pub fn skip_reporter(&self) -> bool {
        self.skip_reporter || has_skip_reporter(&self.playwright_args)
    }
}

#[derive(Args, Debug, Default)]
pub struct CodegenArgs {
    /// Record against an app that is already running at this URL
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    pub url: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct StartAppArgs {
    /// Start with `start` instead of `dev`
    #[arg(long)]
    pub production: bool,

    /// App port, overrides APP_PORT
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Builder seeded from `lookup` with this invocation's flags applied on top
    pub fn config_builder<F>(&self, lookup: F) -> SequencerConfigBuilder
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = SequencerConfigBuilder::from_lookup(lookup);

        if let Some(ms) = self.interval_ms {
            builder = builder.poll_interval(Duration::from_millis(ms));
        }
        if let Some(max) = self.max_attempts {
            builder = builder.max_attempts(max);
        }

        match &self.command {
            Commands::Test(args) => {
                if let Some(url) = args.target_url() {
                    builder = builder.external_url(url);
                }
                builder = builder.skip_reporter(args.skip_reporter());
            }
            Commands::Codegen(args) => {
                if let Some(url) = args.url.clone().filter(|url| !url.is_empty()) {
                    builder = builder.external_url(url);
                }
            }
            Commands::StartApp(args) => {
                builder = builder.production(args.production);
                if let Some(port) = args.port {
                    builder = builder.port(port);
                }
            }
            Commands::ReinstallApp | Commands::InstallDeps => {}
        }

        builder
    }

    pub fn to_config<F>(&self, lookup: F) -> SharedResult<SequencerConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.config_builder(lookup).build()
    }
}
