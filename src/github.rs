//! GitHub REST calls scoped to the action's repository.
//!
//! Calls are blocking and attempted once; any transport failure or non-2xx
//! status surfaces as an [`ActionError`] for the orchestrator's error boundary.
use crate::config::RepoSlug;
use crate::error::{ActionError, ActionResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

const PER_PAGE: usize = 100;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("slither-docs-action/", env!("CARGO_PKG_VERSION"));

/// Head side of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHead {
    pub ref_name: String,
    /// `owner/repo` of the head repository; `None` when the fork was deleted.
    pub repo_full_name: Option<String>,
}

impl PullRequestHead {
    /// True when the head branch lives in `repository` itself rather than a fork.
    pub fn is_from(&self, repository: &RepoSlug) -> bool {
        self.repo_full_name.as_deref() == Some(repository.full_name().as_str())
    }
}

/// Operations the action needs from the code host.
pub trait HostApi {
    fn changed_files(&self, number: u64) -> ActionResult<Vec<String>>;
    fn pull_request_head(&self, number: u64) -> ActionResult<PullRequestHead>;
    fn remove_label(&self, number: u64, label: &str) -> ActionResult<()>;
    fn create_comment(&self, number: u64, body: &str) -> ActionResult<()>;
}

#[derive(Deserialize)]
struct PullFile {
    filename: String,
}

#[derive(Deserialize)]
struct PullRequest {
    head: PullHead,
}

#[derive(Deserialize)]
struct PullHead {
    #[serde(rename = "ref")]
    ref_name: String,
    repo: Option<HeadRepo>,
}

#[derive(Deserialize)]
struct HeadRepo {
    full_name: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct GitHubClient {
    agent: Agent,
    api_url: String,
    repository: RepoSlug,
    token: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, repository: RepoSlug, token: &str) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(30)))
            .build();
        Self {
            agent: Agent::new_with_config(config),
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
            token: token.to_string(),
        }
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url, self.repository.owner, self.repository.name, suffix
        )
    }

    /// Attach auth and the REST API headers every call carries.
    fn authorized<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ActionResult<T> {
        let mut request = self.authorized(self.agent.get(url));
        for (key, value) in query {
            request = request.query(*key, value);
        }
        let response = request.call().map_err(transport_error)?;
        let mut response = check_status(response)?;
        response
            .body_mut()
            .read_json()
            .map_err(|err| ActionError::HostTransport(format!("decode {url}: {err}")))
    }
}

impl HostApi for GitHubClient {
    fn changed_files(&self, number: u64) -> ActionResult<Vec<String>> {
        let url = self.repo_url(&format!("pulls/{number}/files"));
        let mut files = Vec::new();
        for page in 1.. {
            let batch: Vec<PullFile> = self.get_json(
                &url,
                &[("per_page", PER_PAGE.to_string()), ("page", page.to_string())],
            )?;
            let last_page = batch.len() < PER_PAGE;
            files.extend(batch.into_iter().map(|file| file.filename));
            if last_page {
                break;
            }
        }
        tracing::debug!(?files, "changed files");
        Ok(files)
    }

    fn pull_request_head(&self, number: u64) -> ActionResult<PullRequestHead> {
        let url = self.repo_url(&format!("pulls/{number}"));
        let pull: PullRequest = self.get_json(&url, &[])?;
        Ok(PullRequestHead {
            ref_name: pull.head.ref_name,
            repo_full_name: pull.head.repo.map(|repo| repo.full_name),
        })
    }

    fn remove_label(&self, number: u64, label: &str) -> ActionResult<()> {
        let url = self.repo_url(&format!(
            "issues/{number}/labels/{}",
            urlencoding::encode(label)
        ));
        let response = self
            .authorized(self.agent.delete(&url))
            .call()
            .map_err(transport_error)?;
        check_status(response)?;
        tracing::info!(label, number, "removed trigger label");
        Ok(())
    }

    fn create_comment(&self, number: u64, body: &str) -> ActionResult<()> {
        let url = self.repo_url(&format!("issues/{number}/comments"));
        let response = self
            .authorized(self.agent.post(&url))
            .send_json(serde_json::json!({ "body": body }))
            .map_err(transport_error)?;
        check_status(response)?;
        tracing::info!(number, "posted status comment");
        Ok(())
    }
}

fn transport_error(err: ureq::Error) -> ActionError {
    ActionError::HostTransport(err.to_string())
}

fn check_status(mut response: Response<Body>) -> ActionResult<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.body_mut().read_to_string().unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    Err(ActionError::HostApi {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
