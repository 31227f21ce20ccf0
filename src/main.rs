use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod action;
mod cli;
mod config;
mod docs;
mod error;
mod event;
mod exec;
mod git;
mod github;
mod install;
mod runner_log;
mod scratch;

use action::RunStatus;
use cli::RootArgs;
use config::ActionConfig;
use event::TriggerEvent;
use exec::SystemRunner;
use github::GitHubClient;

fn main() -> ExitCode {
    let args = RootArgs::parse();
    init_tracing(args.debug);

    match run(&args) {
        Ok(RunStatus::Failed(err)) => {
            tracing::debug!(error = ?err, "run failed");
            ExitCode::FAILURE
        }
        Ok(status) => status.exit_code(),
        Err(err) => {
            tracing::error!("{err:#}");
            runner_log::set_failed(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RootArgs) -> Result<RunStatus> {
    let config = ActionConfig::from_args(args)?;
    tracing::debug!(?config, "resolved inputs");
    let event = TriggerEvent::load(&args.event_name, args.event_path.as_deref())?;
    let host = GitHubClient::new(
        &config.api_url,
        config.repository.clone(),
        &config.github_token,
    );
    Ok(action::run(&config, &event, &host, &SystemRunner))
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();
}
