//! Git plumbing for the PR branch: checkout and the commit-if-changed push.
use crate::error::{ActionError, ActionResult};
use crate::exec::{CommandOutput, CommandRunner, CommandSpec};
use crate::runner_log::LogGroup;
use std::path::Path;

pub const BOT_NAME: &str = "github-actions[bot]";
pub const BOT_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";
pub const COMMIT_MESSAGE: &str = "docs: add documentation generated with slither-documentation";

/// Git commands bound to one working tree.
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    workdir: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, workdir: &'a Path) -> Self {
        Self { runner, workdir }
    }

    /// Fetch `branch` and check it out as a local branch tracking `origin/<branch>`.
    pub fn checkout_ref(&self, branch: &str, recursive: bool) -> ActionResult<()> {
        let _group = LogGroup::start("Checkout PR branch");
        self.git(&["fetch", "origin", branch])?;
        let upstream = format!("origin/{branch}");
        self.git(&["checkout", "-b", branch, "--track", upstream.as_str()])?;
        if recursive {
            self.git(&["submodule", "update", "--init", "--recursive"])?;
        }
        Ok(())
    }

    /// Stage `paths`, and commit and push only if that staged anything.
    ///
    /// Paths absent from the working tree (files the PR deletes) are skipped.
    /// Returns whether a commit was pushed. An empty stage produces no commit.
    pub fn commit_and_push(&self, paths: &[String]) -> ActionResult<bool> {
        let _group = LogGroup::start("Commit changes and push to PR");
        self.git(&["config", "user.email", BOT_EMAIL])?;
        self.git(&["config", "user.name", BOT_NAME])?;

        let (present, missing): (Vec<&String>, Vec<&String>) = paths
            .iter()
            .partition(|path| self.workdir.join(path.as_str()).symlink_metadata().is_ok());
        if !missing.is_empty() {
            tracing::info!(?missing, "skipping paths not in the working tree");
        }
        if !present.is_empty() {
            let mut add = vec!["add", "--all", "--"];
            add.extend(present.iter().map(|path| path.as_str()));
            self.git(&add)?;
        }

        // Exit 1 means the index differs from HEAD; anything else non-zero is still "changed".
        let probe = self.git_unchecked(&["diff", "--quiet", "--exit-code", "--staged"])?;
        let has_changes = !probe.success();
        if has_changes {
            self.git(&["commit", "-m", COMMIT_MESSAGE])?;
            self.git(&["push"])?;
        } else {
            tracing::info!("nothing staged; skipping commit");
        }
        Ok(has_changes)
    }

    fn git(&self, args: &[&str]) -> ActionResult<CommandOutput> {
        let output = self.git_unchecked(args)?;
        if !output.success() {
            return Err(ActionError::GitOperation {
                command: format!("git {}", shell_words::join(args)),
                code: output.code,
                detail: output.failure_detail(),
            });
        }
        Ok(output)
    }

    fn git_unchecked(&self, args: &[&str]) -> ActionResult<CommandOutput> {
        self.runner.run(
            &CommandSpec::new("git")
                .args(args)
                .current_dir(self.workdir),
        )
    }
}
