//! Shared test infrastructure for integration tests.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

mod stub_api;

pub use stub_api::{closed_port_url, Route, StubApi};

/// Isolated runner environment: event payload, temp root, and workspace.
pub struct ActionFixture {
    pub temp_dir: TempDir,
    pub event_name: String,
}

impl ActionFixture {
    pub fn new(event_name: &str, payload: &serde_json::Value) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::write(
            temp_dir.path().join("event.json"),
            serde_json::to_string(payload).expect("serialize payload"),
        )
        .expect("write event payload");
        std::fs::create_dir_all(temp_dir.path().join("workspace")).expect("create workspace");
        Self {
            temp_dir,
            event_name: event_name.to_string(),
        }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run the action binary with a clean environment shaped like a runner's.
    pub fn run(&self, api_url: &str) -> Output {
        let bin = env!("CARGO_BIN_EXE_slither-docs");
        Command::new(bin)
            .env_clear()
            .env("PATH", std::env::var_os("PATH").unwrap_or_default())
            .env("INPUT_TRIGGER-LABEL", "document")
            .env("INPUT_GITHUB-TOKEN", "ghs_test")
            .env("INPUT_OPENAI-API-KEY", "sk-test")
            .env("INPUT_TARGET", ".")
            .env("INPUT_SOLC-VERSION", "none")
            .env("INPUT_SLITHER-VERSION", "latest")
            .env("GITHUB_EVENT_NAME", &self.event_name)
            .env("GITHUB_EVENT_PATH", self.root().join("event.json"))
            .env("GITHUB_REPOSITORY", "octo/demo")
            .env("GITHUB_API_URL", api_url)
            .env("GITHUB_WORKSPACE", self.root().join("workspace"))
            .env("RUNNER_TEMP", self.root().join("runner-temp"))
            .output()
            .expect("run slither-docs")
    }
}

pub fn labeled_payload(label: &str) -> serde_json::Value {
    serde_json::json!({
        "action": "labeled",
        "label": { "name": label },
        "number": 7,
        "pull_request": { "number": 7 }
    })
}
