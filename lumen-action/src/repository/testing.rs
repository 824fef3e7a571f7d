//! Scripted repositories for tests

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use lumen_core::domain::job::JobHandle;
use lumen_core::domain::result::JobResult;
use lumen_core::dto::job::CreateJob;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

use super::{CommentRepository, JobRepository};

/// Job repository replaying a fixed sequence of status responses
///
/// Once the script is exhausted every read reports `running`.
pub(crate) struct ScriptedJobs {
    trigger_error: Option<String>,
    responses: Mutex<VecDeque<Result<Value, String>>>,
    created: Mutex<Vec<CreateJob>>,
    fetches: Mutex<Vec<Instant>>,
}

impl ScriptedJobs {
    pub(crate) fn new(responses: Vec<Result<Value, String>>) -> Self {
        Self {
            trigger_error: None,
            responses: Mutex::new(responses.into()),
            created: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing_trigger(message: &str) -> Self {
        Self {
            trigger_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn fetch_times(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().clone()
    }

    pub(crate) fn created(&self) -> Vec<CreateJob> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for ScriptedJobs {
    async fn create_job(&self, req: &CreateJob) -> Result<JobHandle> {
        self.created.lock().unwrap().push(req.clone());
        match &self.trigger_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(JobHandle {
                id: "t1".to_string(),
                dashboard_url: "https://app.lumen.dev/jobs/t1".to_string(),
            }),
        }
    }

    async fn fetch_job(&self, _job_id: &str) -> Result<JobResult> {
        self.fetches.lock().unwrap().push(Instant::now());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(payload)) => Ok(JobResult::from_value(&payload)),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(JobResult::from_value(&json!({ "status": "running" }))),
        }
    }
}

/// Comment repository that records what it was asked to post
#[derive(Default)]
pub(crate) struct RecordingComments {
    fail: bool,
    posted: Mutex<Vec<(u64, String)>>,
}

impl RecordingComments {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub(crate) fn posted(&self) -> Vec<(u64, String)> {
        self.posted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommentRepository for RecordingComments {
    async fn post_comment(&self, number: u64, body: &str) -> Result<()> {
        self.posted.lock().unwrap().push((number, body.to_string()));
        if self.fail {
            return Err(anyhow!("API error (status 403): Resource not accessible by integration"));
        }
        Ok(())
    }
}
