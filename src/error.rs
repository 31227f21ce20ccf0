//! Failure kinds raised inside a documentation cycle.
//!
//! Every variant here is caught by the single boundary in `action::run`,
//! which turns it into one PR comment and a failed run status.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("RUNNER_TEMP is not set; cannot provision a scratch directory")]
    MissingRunnerTemp,

    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),

    #[error("cannot build tool search path: {0}")]
    SearchPath(#[from] std::env::JoinPathsError),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("problem creating Python venv (python3 exited with {code})")]
    EnvironmentCreation { code: i32 },

    #[error("problem installing slither into venv (pip3 exited with {code}){detail}")]
    Install { code: i32, detail: String },

    #[error("problem selecting solc {version} (solc-select exited with {code})")]
    CompilerSelect { version: String, code: i32 },

    #[error("problem executing slither-documentation (exited with {code}){detail}")]
    ToolExecution { code: i32, detail: String },

    #[error("`{command}` exited with {code}{detail}")]
    GitOperation {
        command: String,
        code: i32,
        detail: String,
    },

    #[error("GitHub API request failed: {0}")]
    HostTransport(String),

    #[error("GitHub API returned {status}: {message}")]
    HostApi { status: u16, message: String },
}

pub type ActionResult<T> = Result<T, ActionError>;
