//! slither-documentation invocation.
use crate::error::{ActionError, ActionResult};
use crate::exec::{CommandRunner, CommandSpec};
use crate::install::Toolchain;
use crate::runner_log::LogGroup;
use std::path::Path;

pub const DOCUMENTATION_TOOL: &str = "slither-documentation";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
/// Where slither-documentation writes its codex transcripts when `--codex-log` is on.
const CODEX_LOG_DIR: &str = "crytic_export/codex";

/// Options for a single documentation run.
pub struct DocsRun<'a> {
    pub target: &'a str,
    pub openai_token: &'a str,
    pub workspace: &'a Path,
    pub debug: bool,
}

/// Run slither-documentation against `target`, rewriting sources in place.
pub fn run_documentation(
    runner: &dyn CommandRunner,
    toolchain: &Toolchain,
    run: &DocsRun<'_>,
) -> ActionResult<()> {
    {
        let _group = LogGroup::start("Run slither-documentation");
        let mut args = vec![run.target, "--overwrite", "--force-answer-parsing"];
        if run.debug {
            args.push("--codex-log");
        }
        let output = runner.run(
            &CommandSpec::new(DOCUMENTATION_TOOL)
                .args(args)
                .env(OPENAI_KEY_VAR, run.openai_token)
                .search_path(Some(&toolchain.search_path))
                .current_dir(run.workspace),
        )?;
        if !output.success() {
            return Err(ActionError::ToolExecution {
                code: output.code,
                detail: output.failure_detail(),
            });
        }
    }

    if run.debug {
        show_codex_log(runner, run.workspace);
    }
    Ok(())
}

/// Best-effort dump of the codex transcripts; never fails the run.
fn show_codex_log(runner: &dyn CommandRunner, workspace: &Path) {
    let _group = LogGroup::start("Show codex log");
    let spec = CommandSpec::new("grep")
        .args(["-Hr", ".", CODEX_LOG_DIR])
        .current_dir(workspace);
    match runner.run(&spec) {
        Ok(output) if output.success() => {}
        Ok(_) => tracing::warn!("Log not found"),
        Err(err) => tracing::warn!("Log not found: {err}"),
    }
}
