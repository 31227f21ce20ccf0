//! Subprocess execution for every external tool the action drives.
//!
//! Each step builds a [`CommandSpec`] and hands it to a [`CommandRunner`].
//! Search path and extra environment travel with each spec, so nothing the
//! action does mutates its own process environment.
use crate::error::{ActionError, ActionResult};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// One external invocation: program, argv, and its environment additions.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra variables for the child only. Values are never logged.
    pub envs: Vec<(String, String)>,
    /// Replacement `PATH` for resolving and running the program.
    pub search_path: Option<OsString>,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            ..Self::default()
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn search_path(mut self, path: Option<&OsString>) -> Self {
        self.search_path = path.cloned();
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Shell-quoted command line, safe to log (environment is excluded).
    pub fn display(&self) -> String {
        let mut words = Vec::with_capacity(self.args.len() + 1);
        words.push(self.program.as_str());
        words.extend(self.args.iter().map(String::as_str));
        shell_words::join(words)
    }
}

/// Exit status and captured stderr of a finished command.
///
/// Stdout is relayed to the log as it is collected and not kept.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, or -1 when the process was killed by a signal.
    pub code: i32,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// `": <last stderr line>"`, or empty when the command wrote nothing to stderr.
    pub fn failure_detail(&self) -> String {
        self.stderr
            .lines()
            .map(str::trim)
            .rev()
            .find(|line| !line.is_empty())
            .map(|line| format!(": {line}"))
            .unwrap_or_default()
    }
}

/// Blocking executor for external commands.
///
/// Only a failure to start the process is an error here; a non-zero exit is
/// reported through [`CommandOutput::code`] and judged by the caller.
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> ActionResult<CommandOutput>;
}

/// Runs commands on the host and relays their output to the log.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> ActionResult<CommandOutput> {
        tracing::info!("[command]{}", spec.display());
        let program = resolve_program(spec)?;

        let mut command = Command::new(&program);
        command.args(&spec.args);
        if let Some(path) = &spec.search_path {
            command.env("PATH", path);
        }
        for (key, value) in &spec.envs {
            command.env(key, value);
        }
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| ActionError::Spawn {
            program: spec.program.clone(),
            source,
        })?;
        relay_lines(&String::from_utf8_lossy(&output.stdout));
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        relay_lines(&stderr);

        let code = output.status.code().unwrap_or(-1);
        if code != 0 {
            tracing::debug!(program = %spec.program, code, "command exited non-zero");
        }
        Ok(CommandOutput { code, stderr })
    }
}

fn resolve_program(spec: &CommandSpec) -> ActionResult<PathBuf> {
    let spawn_error = |source: io::Error| ActionError::Spawn {
        program: spec.program.clone(),
        source,
    };
    let cwd = match &spec.current_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(spawn_error)?,
    };
    let search = spec
        .search_path
        .clone()
        .or_else(|| std::env::var_os("PATH"));
    which::which_in(&spec.program, search, cwd)
        .map_err(|err| spawn_error(io::Error::new(io::ErrorKind::NotFound, err.to_string())))
}

fn relay_lines(text: &str) {
    for line in text.lines() {
        tracing::info!("{line}");
    }
}

/// Recording runner for tests: every call succeeds unless a rule matches.
#[cfg(test)]
pub mod fake {
    use super::{CommandOutput, CommandRunner, CommandSpec};
    use crate::error::ActionResult;
    use std::cell::RefCell;

    #[derive(Clone)]
    struct Rule {
        prefix: String,
        code: i32,
        stderr: String,
        once: bool,
    }

    #[derive(Default)]
    pub struct FakeRunner {
        rules: RefCell<Vec<Rule>>,
        calls: RefCell<Vec<CommandSpec>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Exit with `code` for any command line starting with `prefix`.
        pub fn exit_with(self, prefix: &str, code: i32) -> Self {
            self.push_rule(prefix, code, "", false)
        }

        /// Like [`exit_with`](Self::exit_with), also writing `stderr`.
        pub fn fail_with(self, prefix: &str, code: i32, stderr: &str) -> Self {
            self.push_rule(prefix, code, stderr, false)
        }

        /// Like [`exit_with`](Self::exit_with), but only for the first match.
        pub fn exit_once(self, prefix: &str, code: i32) -> Self {
            self.push_rule(prefix, code, "", true)
        }

        fn push_rule(self, prefix: &str, code: i32, stderr: &str, once: bool) -> Self {
            self.rules.borrow_mut().push(Rule {
                prefix: prefix.to_string(),
                code,
                stderr: stderr.to_string(),
                once,
            });
            self
        }

        pub fn specs(&self) -> Vec<CommandSpec> {
            self.calls.borrow().clone()
        }

        pub fn command_lines(&self) -> Vec<String> {
            self.calls.borrow().iter().map(CommandSpec::display).collect()
        }

        pub fn count_starting_with(&self, prefix: &str) -> usize {
            self.command_lines()
                .iter()
                .filter(|line| line.starts_with(prefix))
                .count()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, spec: &CommandSpec) -> ActionResult<CommandOutput> {
            let line = spec.display();
            let mut rules = self.rules.borrow_mut();
            let rule = match rules
                .iter()
                .position(|rule| line.starts_with(rule.prefix.as_str()))
            {
                Some(index) if rules[index].once => Some(rules.remove(index)),
                Some(index) => Some(rules[index].clone()),
                None => None,
            };
            let output = rule
                .map(|rule| CommandOutput {
                    code: rule.code,
                    stderr: rule.stderr,
                })
                .unwrap_or_default();
            self.calls.borrow_mut().push(spec.clone());
            Ok(output)
        }
    }
}
