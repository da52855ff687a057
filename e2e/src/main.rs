//! Main entry point for the e2e binary

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

use e2e::cli::{Cli, Commands};
use e2e::{CommandOutcome, Sequencer};
use shared::{Stage, logging, stage_info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_tracing(Some(&cli.log_level));

    let command = cli.command.name();
    logging::log_startup(Stage::Sequencer, &format!("e2e {command}"));

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            logging::log_error(Stage::Sequencer, command, &message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli
        .to_config(|key| std::env::var(key).ok())
        .context("Invalid configuration")?;
    stage_info!(Stage::Sequencer, "APP_BASE_URL: {}", config.target.base_url);

    let mut sequencer = Sequencer::with_real_services(config).context("Failed to set up readiness probes")?;

    let outcome = match cli.command {
        Commands::Test(args) => sequencer
            .run_tests(&args.playwright_args)
            .await
            .context("e2e test run failed")?,
        Commands::Codegen(_) => sequencer.run_codegen().await.context("codegen failed")?,
        Commands::StartApp(_) => sequencer.start_app().await.context("start-app failed")?,
        Commands::ReinstallApp => {
            sequencer.reinstall_app().await.context("reinstall-app failed")?;
            CommandOutcome::exited(0)
        }
        Commands::InstallDeps => sequencer.install_deps().await.context("install-deps failed")?,
    };

    Ok(exit_code(&outcome))
}

/// Map a child's exit status onto ours; anything unrepresentable is a plain failure
fn exit_code(outcome: &CommandOutcome) -> ExitCode {
    u8::try_from(outcome.exit_code())
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
