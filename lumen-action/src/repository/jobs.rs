//! Jobs repository
//!
//! Handles communication with the testing service for job operations:
//! - Creating a job for the current change
//! - Reading its status while it runs

use anyhow::{Context, Result};
use async_trait::async_trait;
use lumen_client::ServiceClient;
use lumen_core::domain::job::JobHandle;
use lumen_core::domain::result::JobResult;
use lumen_core::dto::job::CreateJob;

/// Repository trait for job operations with the testing service
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Creates a job
    ///
    /// Issues exactly one request; failures are not retried.
    async fn create_job(&self, req: &CreateJob) -> Result<JobHandle>;

    /// Reads the current status payload of a job
    ///
    /// # Arguments
    /// * `job_id` - The service-issued job id
    async fn fetch_job(&self, job_id: &str) -> Result<JobResult>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: ServiceClient,
    project_id: String,
}

impl HttpJobRepository {
    /// Creates a new HTTP job repository
    ///
    /// # Arguments
    /// * `client` - Configured testing service client
    /// * `project_id` - Project every status read is scoped to
    pub fn new(client: ServiceClient, project_id: String) -> Self {
        Self { client, project_id }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn create_job(&self, req: &CreateJob) -> Result<JobHandle> {
        self.client
            .create_job(req)
            .await
            .context("Failed to create visual test job")
    }

    async fn fetch_job(&self, job_id: &str) -> Result<JobResult> {
        self.client
            .get_job(job_id, &self.project_id)
            .await
            .with_context(|| format!("Failed to read status of job {}", job_id))
    }
}
