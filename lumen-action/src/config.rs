//! Action configuration
//!
//! Every setting is a command-line flag that can also be supplied through
//! the environment. Workflow inputs arrive as `INPUT_*` variables and the
//! runner context as the standard `GITHUB_*` variables, so on a runner the
//! binary is normally started without any flags.

use clap::{ArgAction, Parser};
use lumen_client::{DEFAULT_API_URL, DEFAULT_DASHBOARD_URL, DEFAULT_GITHUB_API_URL, RepoRef};
use lumen_core::domain::testing::TestingConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Action configuration
#[derive(Debug, Clone, Parser)]
#[command(name = "lumen-action")]
#[command(about = "Run Lumen visual tests for a pull request", long_about = None)]
pub struct Config {
    /// Testing service API key
    #[arg(long, env = "INPUT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Organization the project belongs to
    #[arg(long, env = "INPUT_ORGANIZATION_ID", hide_env_values = true)]
    pub organization_id: String,

    /// Project to run the tests under
    #[arg(long, env = "INPUT_PROJECT_ID", hide_env_values = true)]
    pub project_id: String,

    /// Deployed preview to test
    #[arg(long, env = "INPUT_TARGET_URL")]
    pub target_url: String,

    /// Poll for results instead of returning right after the trigger
    #[arg(long, env = "INPUT_WAIT_FOR_RESULTS", default_value_t = true, action = ArgAction::Set)]
    pub wait_for_results: bool,

    /// Overall wait for results, in seconds
    #[arg(long, env = "INPUT_TIMEOUT", default_value_t = 1800)]
    pub timeout: u64,

    /// Delay between status reads, in seconds
    #[arg(long, env = "INPUT_POLL_INTERVAL", default_value_t = 30)]
    pub poll_interval: u64,

    /// Fail the run when any critical issue is reported
    #[arg(long, env = "INPUT_FAIL_ON_CRITICAL", default_value_t = false, action = ArgAction::Set)]
    pub fail_on_critical: bool,

    /// Post the report as a pull request comment
    #[arg(long, env = "INPUT_COMMENT_ON_PR", default_value_t = true, action = ArgAction::Set)]
    pub comment_on_pr: bool,

    /// Token for the GitHub comment API
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Comma-separated browsers (chrome, firefox, safari)
    #[arg(long, env = "INPUT_BROWSERS", default_value = "chrome")]
    pub browsers: String,

    /// Comma-separated WIDTHxHEIGHT viewports
    #[arg(long, env = "INPUT_VIEWPORTS", default_value = "1920x1080")]
    pub viewports: String,

    /// `pr-changes` to test only changed components, anything else for full page
    #[arg(long, env = "INPUT_SCOPE", default_value = "pr-changes")]
    pub scope: String,

    /// Comma-separated test types to run
    #[arg(long, env = "INPUT_TEST_TYPES", default_value = "")]
    pub test_types: String,

    /// Comma-separated test types to skip
    #[arg(long, env = "INPUT_EXCLUDE_TEST_TYPES", default_value = "")]
    pub exclude_test_types: String,

    /// Testing service API endpoint
    #[arg(long, env = "INPUT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Dashboard origin used for job links
    #[arg(long, env = "INPUT_DASHBOARD_URL", default_value = DEFAULT_DASHBOARD_URL)]
    pub dashboard_url: String,

    /// Repository slug (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Path to the JSON payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Workflow run number
    #[arg(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: Option<u64>,

    /// Commit the workflow runs on
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Branch or tag the workflow runs on
    #[arg(long, env = "GITHUB_REF_NAME")]
    pub ref_name: Option<String>,

    /// GitHub REST endpoint
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_GITHUB_API_URL)]
    pub github_api_url: String,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// File receiving the run summary markdown
    #[arg(long, env = "GITHUB_STEP_SUMMARY")]
    pub step_summary_file: Option<PathBuf>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("api_key cannot be empty");
        }

        if self.organization_id.trim().is_empty() {
            anyhow::bail!("organization_id cannot be empty");
        }

        if self.project_id.trim().is_empty() {
            anyhow::bail!("project_id cannot be empty");
        }

        for (name, url) in [("target_url", &self.target_url), ("api_url", &self.api_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_interval == 0 {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.timeout == 0 {
            anyhow::bail!("timeout must be greater than 0");
        }

        Ok(())
    }

    /// Validated testing configuration built from the raw list inputs
    pub fn testing(&self) -> TestingConfig {
        TestingConfig::from_inputs(
            &self.browsers,
            &self.viewports,
            &self.test_types,
            &self.exclude_test_types,
            &self.scope,
        )
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// GitHub token, ignoring an input that was left blank
    pub fn github_token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn repo(&self) -> Option<RepoRef> {
        self.repository.as_deref().and_then(RepoRef::parse)
    }
}
