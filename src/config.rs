//! Resolved action configuration.
//!
//! Built once from [`RootArgs`](crate::cli::RootArgs); every later step reads
//! from here instead of the environment.
use crate::cli::RootArgs;
use crate::install::{SlitherVersion, SolcVersion};
use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::PathBuf;

/// `owner/name` of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn parse(raw: &str) -> Result<Self> {
        let (owner, name) = raw
            .split_once('/')
            .ok_or_else(|| anyhow!("repository must be owner/name, got {raw:?}"))?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(anyhow!("repository must be owner/name, got {raw:?}"));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

pub struct ActionConfig {
    pub trigger_label: String,
    pub github_token: String,
    pub openai_token: String,
    pub target: String,
    pub solc: SolcVersion,
    pub slither: SlitherVersion,
    pub repository: RepoSlug,
    pub api_url: String,
    pub runner_temp: Option<PathBuf>,
    pub workspace: PathBuf,
    pub debug: bool,
}

impl ActionConfig {
    pub fn from_args(args: &RootArgs) -> Result<Self> {
        let repository = RepoSlug::parse(&args.repository).context("resolve GITHUB_REPOSITORY")?;
        let workspace = match &args.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("resolve working directory")?,
        };
        Ok(Self {
            trigger_label: input(&args.trigger_label),
            github_token: input(&args.github_token),
            openai_token: input(&args.openai_api_key),
            target: input(&args.target),
            solc: SolcVersion::parse(&input(&args.solc_version)),
            slither: SlitherVersion::parse(&input(&args.slither_version)),
            repository,
            api_url: args.api_url.clone(),
            runner_temp: args.runner_temp.clone(),
            workspace,
            debug: args.debug,
        })
    }
}

/// Action inputs arrive with whatever whitespace the workflow YAML left around them.
fn input(raw: &str) -> String {
    raw.trim().to_string()
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("trigger_label", &self.trigger_label)
            .field("github_token", &"<redacted>")
            .field("openai_token", &"<redacted>")
            .field("target", &self.target)
            .field("solc", &self.solc)
            .field("slither", &self.slither)
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("runner_temp", &self.runner_temp)
            .field("workspace", &self.workspace)
            .field("debug", &self.debug)
            .finish()
    }
}
