//! Job DTOs for the testing service

use serde::{Deserialize, Serialize};

use crate::domain::testing::TestingConfig;

/// Request to create a new visual-testing job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
    pub organization_id: String,
    pub project_id: String,
    pub target_url: String,
    pub change: ChangeMetadata,
    pub config: TestingConfig,
}

/// The code change a job is run for
///
/// Populated from the pull request that triggered the workflow. Outside of
/// pull request events only the branch and commit are known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeMetadata {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub author: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub commit_sha: Option<String>,
}

/// Response to a job creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedJob {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::Scope;

    #[test]
    fn test_create_job_wire_shape() {
        let req = CreateJob {
            organization_id: "org-1".to_string(),
            project_id: "proj-1".to_string(),
            target_url: "https://preview.example.com".to_string(),
            change: ChangeMetadata {
                number: Some(42),
                source_branch: Some("feature/login".to_string()),
                commit_sha: Some("abc123".to_string()),
                ..Default::default()
            },
            config: TestingConfig {
                scope: Scope::FullPage,
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["organizationId"], "org-1");
        assert_eq!(json["targetUrl"], "https://preview.example.com");
        assert_eq!(json["change"]["number"], 42);
        assert_eq!(json["change"]["sourceBranch"], "feature/login");
        assert_eq!(json["change"]["commitSha"], "abc123");
        assert_eq!(json["config"]["scope"], "full-page");
    }
}
