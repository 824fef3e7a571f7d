//! GitHub issue comment API

use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::handle_response;

/// Public GitHub REST endpoint
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const AGENT: &str = "lumen-action";

/// Repository coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parses an `owner/name` slug as found in `GITHUB_REPOSITORY`
    pub fn parse(slug: &str) -> Option<Self> {
        let (owner, name) = slug.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A created issue comment
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// HTTP client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubClient {
    api_base: String,
    token: String,
    client: Client,
}

impl GithubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// * `api_base` - REST endpoint, `GITHUB_API_URL` on Actions runners
    /// * `token` - Token sent as a bearer credential
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Post a comment on an issue or pull request
    pub async fn create_issue_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<IssueComment> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, repo.owner, repo.name, number
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.trim())
            .header(USER_AGENT, AGENT)
            .header(ACCEPT, "application/vnd.github+json")
            .json(&json!({ "body": body }))
            .send()
            .await?;

        handle_response(response).await
    }
}
