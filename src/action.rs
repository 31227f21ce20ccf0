//! The documentation cycle for one labeled pull request.
//!
//! Steps run strictly in order: list changed files, check the PR head is
//! not a fork, install slither, check out the PR branch, document, commit and
//! push, drop the trigger label, comment. Every failure inside the cycle
//! lands in [`run`], which posts exactly one error comment.
use crate::config::ActionConfig;
use crate::docs::{run_documentation, DocsRun};
use crate::error::{ActionError, ActionResult};
use crate::event::TriggerEvent;
use crate::exec::CommandRunner;
use crate::git::Git;
use crate::github::HostApi;
use crate::install::install;
use crate::runner_log;
use std::process::ExitCode;

/// Extension of the files slither-documentation annotates.
pub const SOURCE_EXTENSION: &str = ".sol";

pub const INVALID_TRIGGER_MESSAGE: &str =
    "The action was ran on an event different than pull_request. This is unsupported,";
pub const PUSHED_MESSAGE: &str = "Documentation was generated and pushed to the repository 🚀";
pub const NO_CHANGES_MESSAGE: &str = "slither-documentation did not generate any changes 🤷";

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Documented { pushed: bool },
    NoRelevantChanges,
    ForkOrigin,
}

#[derive(Debug)]
pub enum RunStatus {
    Completed(Outcome),
    /// Not a trigger-label event; nothing was attempted.
    InvalidTrigger,
    Failed(ActionError),
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

pub fn failure_comment(err: &ActionError) -> String {
    format!(
        "An error occured 😔 {err}\n\nPlease review the GitHub Actions workflow execution for more details."
    )
}

/// Paths with the documented extension, in their original order.
pub fn relevant_files(changed: &[String]) -> Vec<String> {
    changed
        .iter()
        .filter(|path| path.ends_with(SOURCE_EXTENSION))
        .cloned()
        .collect()
}

pub fn run(
    config: &ActionConfig,
    event: &TriggerEvent,
    host: &dyn HostApi,
    runner: &dyn CommandRunner,
) -> RunStatus {
    let Some(number) = event.document_request(&config.trigger_label) else {
        tracing::debug!(?event, "event is not a trigger label addition");
        runner_log::set_failed(INVALID_TRIGGER_MESSAGE);
        return RunStatus::InvalidTrigger;
    };

    match document(config, number, host, runner) {
        Ok(outcome) => {
            if let Outcome::Documented { pushed } = outcome {
                tracing::info!(pushed, "documentation cycle finished");
            }
            RunStatus::Completed(outcome)
        }
        Err(err) => {
            tracing::error!("documentation failed: {err}");
            if let Err(comment_err) = host.create_comment(number, &failure_comment(&err)) {
                tracing::error!("could not report failure on #{number}: {comment_err}");
            }
            runner_log::set_failed(&err.to_string());
            RunStatus::Failed(err)
        }
    }
}

fn document(
    config: &ActionConfig,
    number: u64,
    host: &dyn HostApi,
    runner: &dyn CommandRunner,
) -> ActionResult<Outcome> {
    let changed = host.changed_files(number)?;
    let sources = relevant_files(&changed);
    if sources.is_empty() {
        tracing::debug!("No code changed");
        return Ok(Outcome::NoRelevantChanges);
    }

    let head = host.pull_request_head(number)?;
    if !head.is_from(&config.repository) {
        tracing::info!("PR is not from this repo, cannot proceed");
        return Ok(Outcome::ForkOrigin);
    }

    let toolchain = install(
        runner,
        config.runner_temp.as_deref(),
        &config.slither,
        &config.solc,
    )?;
    let git = Git::new(runner, &config.workspace);
    git.checkout_ref(&head.ref_name, true)?;
    run_documentation(
        runner,
        &toolchain,
        &DocsRun {
            target: &config.target,
            openai_token: &config.openai_token,
            workspace: &config.workspace,
            debug: config.debug,
        },
    )?;
    let pushed = git.commit_and_push(&sources)?;
    host.remove_label(number, &config.trigger_label)?;

    let message = if pushed {
        PUSHED_MESSAGE
    } else {
        NO_CHANGES_MESSAGE
    };
    host.create_comment(number, message)?;
    Ok(Outcome::Documented { pushed })
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
