//! Lumen HTTP Clients
//!
//! Thin, type-safe clients for the two remote APIs the agent talks to:
//! - [`ServiceClient`]: the visual-testing service (create job, read status)
//! - [`GithubClient`]: the pull request comment API
//!
//! # Example
//!
//! ```no_run
//! use lumen_client::ServiceClient;
//!
//! # async fn example() -> lumen_client::Result<()> {
//! let client = ServiceClient::new("https://api.lumen.dev", "my-api-key");
//! let result = client.get_job("job-123", "project-1").await?;
//! println!("status: {}", result.status);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod github;
mod jobs;

pub use error::{ClientError, Result};
pub use github::{DEFAULT_GITHUB_API_URL, GithubClient, IssueComment, RepoRef};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// Default testing service API endpoint
pub const DEFAULT_API_URL: &str = "https://api.lumen.dev";

/// Default dashboard origin used to build job links
pub const DEFAULT_DASHBOARD_URL: &str = "https://app.lumen.dev";

/// HTTP client for the visual-testing service
///
/// Every request carries the API key as a bearer token.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    /// Base URL of the service API (e.g., "https://api.lumen.dev")
    base_url: String,
    /// Origin of the web dashboard, used for job links
    dashboard_url: String,
    api_key: String,
    client: Client,
}

impl ServiceClient {
    /// Create a new service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service API
    /// * `api_key` - The API key sent as a bearer token
    ///
    /// # Example
    /// ```
    /// use lumen_client::ServiceClient;
    ///
    /// let client = ServiceClient::new("https://api.lumen.dev/", "key");
    /// assert_eq!(client.base_url(), "https://api.lumen.dev");
    /// ```
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, Client::new())
    }

    /// Create a new service client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            dashboard_url: DEFAULT_DASHBOARD_URL.to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Override the dashboard origin used for job links
    pub fn with_dashboard_url(mut self, dashboard_url: impl Into<String>) -> Self {
        let dashboard_url = dashboard_url.into();
        self.dashboard_url = dashboard_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the base URL of the service API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Dashboard link for a job
    ///
    /// Built only from the dashboard origin and the service-issued job id.
    /// Organization and project ids are usually CI secrets; a URL containing
    /// them would be masked in the CI log and in published outputs.
    pub fn dashboard_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.dashboard_url, job_id)
    }
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Handle an API response and deserialize JSON
///
/// Non-success statuses become [`ClientError::ApiError`] carrying the
/// status code and the raw response body.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}
