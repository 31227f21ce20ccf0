//! Command-line surface.
//!
//! Every flag falls back to the variable the GitHub Actions runner exports,
//! so the binary runs unchanged as an action step or by hand.
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Parser, Debug)]
#[command(
    name = "slither-docs",
    version,
    about = "Generate slither-documentation for a labeled pull request and push it back",
    after_help = "Runs as a GitHub Actions step: action inputs arrive as INPUT_* variables and\nthe event payload is read from GITHUB_EVENT_PATH."
)]
pub struct RootArgs {
    /// Label whose addition triggers documentation
    #[arg(long, env = "INPUT_TRIGGER-LABEL", value_name = "LABEL")]
    pub trigger_label: String,

    /// Token for the GitHub REST API and git push
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// OpenAI API key handed to slither-documentation
    #[arg(long, env = "INPUT_OPENAI-API-KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Path slither-documentation analyzes
    #[arg(long, env = "INPUT_TARGET", value_name = "PATH")]
    pub target: String,

    /// solc version to select; empty or `none` lets slither decide
    #[arg(long, env = "INPUT_SOLC-VERSION", value_name = "VERSION", default_value = "")]
    pub solc_version: String,

    /// `latest`, an exact X.Y.Z release, or a git reference of crytic/slither
    #[arg(long, env = "INPUT_SLITHER-VERSION", value_name = "VERSION", default_value = "latest")]
    pub slither_version: String,

    /// Name of the event that started the workflow
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "")]
    pub event_name: String,

    /// JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH", value_name = "PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository the workflow runs in, as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/NAME")]
    pub repository: String,

    /// REST API root (GitHub Enterprise servers differ)
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Scratch root for the tool venv
    #[arg(long, env = "RUNNER_TEMP", value_name = "DIR")]
    pub runner_temp: Option<PathBuf>,

    /// Checked-out repository where git and the tool run
    #[arg(long, env = "GITHUB_WORKSPACE", value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Verbose tool logging and codex log dump
    #[arg(long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}
