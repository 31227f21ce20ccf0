//! The workflow event that started this run.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const PULL_REQUEST_EVENT: &str = "pull_request";
pub const LABELED_ACTION: &str = "labeled";

#[derive(Debug, Default, Deserialize)]
struct Payload {
    action: Option<String>,
    label: Option<Named>,
    pull_request: Option<Numbered>,
    issue: Option<Numbered>,
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Numbered {
    number: u64,
}

/// The parts of a workflow event the action inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerEvent {
    pub name: String,
    pub action: Option<String>,
    pub label: Option<String>,
    /// PR or issue number the event refers to.
    pub number: Option<u64>,
}

impl TriggerEvent {
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let payload: Payload = serde_json::from_str(json).context("parse event payload")?;
        Ok(Self::from_payload(name, payload))
    }

    /// Load the payload at `path`. An absent file yields an event with no payload fields.
    pub fn load(name: &str, path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.filter(|path| path.is_file()) else {
            tracing::debug!("no event payload available");
            return Ok(Self::from_payload(name, Payload::default()));
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("read event payload {}", path.display()))?;
        Self::from_json(name, &json)
    }

    fn from_payload(name: &str, payload: Payload) -> Self {
        let number = payload
            .pull_request
            .map(|pull| pull.number)
            .or_else(|| payload.issue.map(|issue| issue.number))
            .or(payload.number);
        Self {
            name: name.to_string(),
            action: payload.action,
            label: payload.label.map(|label| label.name),
            number,
        }
    }

    /// PR number when this is `trigger_label` being added to a pull request.
    pub fn document_request(&self, trigger_label: &str) -> Option<u64> {
        let requested = self.name == PULL_REQUEST_EVENT
            && self.action.as_deref() == Some(LABELED_ACTION)
            && self.label.as_deref() == Some(trigger_label);
        if requested {
            self.number
        } else {
            None
        }
    }
}
