//! Destination repository provisioning through the GitHub REST API.
//!
//! [`ensure_repo`] looks the repository up and creates it when missing. A
//! repository owned by the token's user is created under `/user/repos`; any
//! other owner is treated as an organization.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RunnerError;

pub const GITHUB_API: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("bara/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// Where repositories live.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Whether `owner/name` exists and is visible to the caller.
    async fn repo_exists(&self, repo: &str) -> Result<bool, RunnerError>;

    /// Create `owner/name` as a private repository.
    async fn create_repo(&self, repo: &str) -> Result<(), RunnerError>;
}

/// Create `repo` unless it already exists. Returns `true` when created.
pub async fn ensure_repo(host: &dyn RepoHost, repo: &str) -> Result<bool, RunnerError> {
    if host.repo_exists(repo).await? {
        tracing::info!("destination repository {repo} exists");
        return Ok(false);
    }
    tracing::info!("creating destination repository {repo}");
    host.create_repo(repo).await?;
    Ok(true)
}

// ---------------------------------------------------------------------------
// GitHub client
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Serialize)]
struct NewRepo<'a> {
    name: &'a str,
    private: bool,
}

/// Blocking `ureq` client, driven from the blocking pool.
#[derive(Clone)]
pub struct GitHubClient {
    agent: ureq::Agent,
    api: String,
    token: String,
}

impl GitHubClient {
    /// Client for `api.github.com`.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api(GITHUB_API, token)
    }

    /// Client for another API root, e.g. GitHub Enterprise's `GITHUB_API_URL`.
    pub fn with_api(api: impl Into<String>, token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            api: api.into().trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{path}", self.api))
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", ACCEPT)
    }

    fn lookup(&self, repo: &str) -> Result<bool, RunnerError> {
        match self.request("GET", &format!("/repos/{repo}")).call() {
            Ok(_) => Ok(true),
            Err(ureq::Error::Status(404, _)) => Ok(false),
            Err(e) => Err(api_err(format!("lookup of {repo}"), e)),
        }
    }

    fn create(&self, repo: &str) -> Result<(), RunnerError> {
        let (owner, name) = split_repo(repo)?;
        let user: User = self
            .request("GET", "/user")
            .call()
            .map_err(|e| api_err("token user lookup", e))?
            .into_json()
            .map_err(|e| api_err("token user lookup", e))?;

        let path = if user.login.eq_ignore_ascii_case(owner) {
            "/user/repos".to_owned()
        } else {
            format!("/orgs/{owner}/repos")
        };
        self.request("POST", &path)
            .send_json(NewRepo { name, private: true })
            .map_err(|e| api_err(format!("creation of {repo}"), e))?;
        Ok(())
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn repo_exists(&self, repo: &str) -> Result<bool, RunnerError> {
        let client = self.clone();
        let repo = repo.to_owned();
        tokio::task::spawn_blocking(move || client.lookup(&repo)).await?
    }

    async fn create_repo(&self, repo: &str) -> Result<(), RunnerError> {
        let client = self.clone();
        let repo = repo.to_owned();
        tokio::task::spawn_blocking(move || client.create(&repo)).await?
    }
}

fn split_repo(repo: &str) -> Result<(&str, &str), RunnerError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok((owner, name)),
        _ => Err(RunnerError::GitHub {
            action: format!("creation of {repo}"),
            reason: "expected `owner/name`".to_owned(),
        }),
    }
}

fn api_err(action: impl Into<String>, err: impl std::fmt::Display) -> RunnerError {
    RunnerError::GitHub {
        action: action.into(),
        reason: err.to_string(),
    }
}
