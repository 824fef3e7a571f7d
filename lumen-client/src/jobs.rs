//! Job-related API endpoints

use lumen_core::domain::job::JobHandle;
use lumen_core::domain::result::JobResult;
use lumen_core::dto::envelope::unwrap_payload;
use lumen_core::dto::job::{CreateJob, CreatedJob};
use serde_json::Value;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::{ServiceClient, handle_response};

impl ServiceClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Create a new visual-testing job
    ///
    /// Sends exactly one request. A non-success status is returned as an
    /// error carrying the status code and body; there is no retry.
    ///
    /// # Returns
    /// The job handle, with a dashboard link derived from the new job id
    pub async fn create_job(&self, req: &CreateJob) -> Result<JobHandle> {
        let url = format!("{}/v1/jobs", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await?;

        let body: Value = handle_response(response).await?;
        let created: CreatedJob = serde_json::from_value(unwrap_payload(body)).map_err(|e| {
            ClientError::ParseError(format!("Create job response has no job id: {}", e))
        })?;

        debug!("Service accepted job {}", created.id);

        Ok(JobHandle {
            dashboard_url: self.dashboard_url(&created.id),
            id: created.id,
        })
    }

    /// Read the current status payload of a job
    ///
    /// The payload is unwrapped from its envelope and parsed leniently, so
    /// a successful response always yields a [`JobResult`].
    ///
    /// # Arguments
    /// * `job_id` - The service-issued job id
    /// * `project_id` - The project the job belongs to
    pub async fn get_job(&self, job_id: &str, project_id: &str) -> Result<JobResult> {
        let url = format!("{}/v1/jobs/{}", self.base_url, job_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("projectId", project_id)])
            .send()
            .await?;

        let body: Value = handle_response(response).await?;
        Ok(JobResult::from_value(&unwrap_payload(body)))
    }
}
