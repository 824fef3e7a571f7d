//! Run orchestration
//!
//! One run is strictly sequential: trigger the job, wait for it, publish
//! the reports, decide the exit status. Only the trigger can abort a run
//! early; everything after it ends in a [`RunReport`].

use anyhow::{Context, Result};
use lumen_core::domain::job::{FinalStatus, JobHandle};
use lumen_core::domain::result::JobResult;
use lumen_core::domain::testing::TestingConfig;
use lumen_core::dto::job::{ChangeMetadata, CreateJob};
use lumen_core::report::{RenderContext, render_step_summary};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::outputs::ActionOutputs;
use crate::repository::{CommentRepository, JobRepository};
use crate::scheduler::{JobPoller, PollOutcome};
use crate::service::publish_comment;
use crate::verdict::{RunFailure, decide};

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub handle: JobHandle,
    /// Terminal status, `None` when the run did not wait for results
    pub status: Option<FinalStatus>,
    pub result: JobResult,
    pub comment_posted: bool,
    pub verdict: Result<(), RunFailure>,
}

/// Drives one trigger → poll → report run
pub struct Agent {
    config: Config,
    change: ChangeMetadata,
    jobs: Arc<dyn JobRepository>,
    comments: Option<Arc<dyn CommentRepository>>,
    outputs: ActionOutputs,
}

impl Agent {
    pub fn new(
        config: Config,
        change: ChangeMetadata,
        jobs: Arc<dyn JobRepository>,
        comments: Option<Arc<dyn CommentRepository>>,
        outputs: ActionOutputs,
    ) -> Self {
        Self {
            config,
            change,
            jobs,
            comments,
            outputs,
        }
    }

    /// Runs the agent to completion
    ///
    /// # Returns
    /// An error only when the job could not be triggered
    pub async fn run(&self) -> Result<RunReport> {
        let testing = self.config.testing();
        let viewports: Vec<String> = testing.viewports.iter().map(|v| v.to_string()).collect();
        info!(
            "Triggering visual tests for {} ({} browser(s), viewports: {}, scope: {})",
            self.config.target_url,
            testing.browsers.len(),
            viewports.join(", "),
            testing.scope.label()
        );

        let handle = self
            .jobs
            .create_job(&self.build_request(testing.clone()))
            .await
            .context("Could not trigger visual tests")?;

        info!("Triggered job {}", handle.id);
        info!("Dashboard: {}", handle.dashboard_url);
        self.write_outputs(&[
            ("job_id", handle.id.clone()),
            ("dashboard_url", handle.dashboard_url.clone()),
        ]);

        if !self.config.wait_for_results {
            info!("Not waiting for results");
            self.write_outputs(&[("status", "triggered".to_string())]);
            return Ok(RunReport {
                handle,
                status: None,
                result: JobResult::default(),
                comment_posted: false,
                verdict: Ok(()),
            });
        }

        let poller = JobPoller::new(self.config.poll_interval(), self.config.timeout());
        let PollOutcome {
            status,
            result,
            requests,
        } = poller
            .wait_for_completion(self.jobs.as_ref(), &handle.id)
            .await;
        info!(
            "Job {} ended as {} after {} status check(s)",
            handle.id, status, requests
        );

        self.write_outputs(&[
            ("status", status.to_string()),
            ("result", result.result_label().to_string()),
            ("total_issues", result.issues_summary.total.to_string()),
            ("critical_issues", result.issues_summary.critical.to_string()),
        ]);

        let summary = render_step_summary(&status, &result, &handle.dashboard_url);
        if let Err(e) = self.outputs.append_summary(&summary) {
            warn!("{:#}", e);
        }

        let comment_posted = self.comment(&handle, &status, &result, &testing).await;
        let verdict = decide(
            &status,
            &result,
            self.config.fail_on_critical,
            self.config.timeout,
        );

        Ok(RunReport {
            handle,
            status: Some(status),
            result,
            comment_posted,
            verdict,
        })
    }

    fn build_request(&self, config: TestingConfig) -> CreateJob {
        CreateJob {
            organization_id: self.config.organization_id.clone(),
            project_id: self.config.project_id.clone(),
            target_url: self.config.target_url.clone(),
            change: self.change.clone(),
            config,
        }
    }

    async fn comment(
        &self,
        handle: &JobHandle,
        status: &FinalStatus,
        result: &JobResult,
        testing: &TestingConfig,
    ) -> bool {
        if !self.config.comment_on_pr {
            debug!("Commenting disabled");
            return false;
        }

        let Some(comments) = &self.comments else {
            info!("No GitHub token or repository available, skipping comment");
            return false;
        };

        let Some(number) = self.change.number else {
            info!("Not a pull request, skipping comment");
            return false;
        };

        let ctx = RenderContext {
            target_url: self.config.target_url.clone(),
            dashboard_url: handle.dashboard_url.clone(),
            scope: testing.scope,
            test_types: testing.test_types.clone(),
            run_number: self.config.run_number,
        };

        publish_comment(comments.as_ref(), number, status, result, &ctx).await
    }

    fn write_outputs(&self, pairs: &[(&str, String)]) {
        if let Err(e) = self.outputs.set_all(pairs) {
            warn!("{:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::config_with;
    use crate::repository::testing::{RecordingComments, ScriptedJobs};
    use serde_json::json;
    use std::path::PathBuf;

    struct Harness {
        jobs: Arc<ScriptedJobs>,
        comments: Arc<RecordingComments>,
        output_file: PathBuf,
        _dir: tempfile::TempDir,
        agent: Agent,
    }

    fn harness(extra: &[&str], jobs: ScriptedJobs, comments: RecordingComments) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let output_file = dir.path().join("output");
        let jobs = Arc::new(jobs);
        let comments = Arc::new(comments);

        let agent = Agent::new(
            config_with(extra),
            ChangeMetadata {
                number: Some(7),
                ..Default::default()
            },
            jobs.clone(),
            Some(comments.clone()),
            ActionOutputs::new(Some(output_file.clone()), Some(dir.path().join("summary.md"))),
        );

        Harness {
            jobs,
            comments,
            output_file,
            _dir: dir,
            agent,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_passing_run_end_to_end() {
        let h = harness(
            &[],
            ScriptedJobs::new(vec![
                Ok(json!({ "status": "running" })),
                Ok(json!({
                    "status": "completed",
                    "result": "passed",
                    "issuesSummary": { "total": 0, "critical": 0 }
                })),
            ]),
            RecordingComments::default(),
        );

        let report = h.agent.run().await.unwrap();

        assert_eq!(report.handle.id, "t1");
        assert_eq!(report.status, Some(FinalStatus::Completed));
        assert_eq!(report.verdict, Ok(()));
        assert!(report.comment_posted);
        assert_eq!(h.jobs.fetch_times().len(), 2);

        let posted = h.comments.posted();
        assert_eq!(posted.len(), 1);
        assert!(posted[0].1.contains("✅ Visual Tests: Passed"));
        assert!(!posted[0].1.contains("### 🐛 Issues"));

        let outputs = std::fs::read_to_string(&h.output_file).unwrap();
        assert!(outputs.contains("job_id=t1\n"));
        assert!(outputs.contains("dashboard_url=https://app.lumen.dev/jobs/t1\n"));
        assert!(outputs.contains("status=completed\n"));
        assert!(outputs.contains("result=passed\n"));
        assert!(outputs.contains("critical_issues=0\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_run_end_to_end() {
        let h = harness(
            &["--timeout", "60", "--poll-interval", "30"],
            ScriptedJobs::new(vec![]),
            RecordingComments::default(),
        );

        let report = h.agent.run().await.unwrap();

        assert_eq!(h.jobs.fetch_times().len(), 2);
        assert_eq!(report.status, Some(FinalStatus::TimedOut));
        let failure = report.verdict.unwrap_err();
        assert_eq!(failure, RunFailure::TimedOut { seconds: 60 });
        assert!(failure.to_string().contains("timed out"));
        assert!(h.comments.posted()[0].1.contains("Timed Out"));

        let outputs = std::fs::read_to_string(&h.output_file).unwrap();
        assert!(outputs.contains("status=timeout\n"));
        assert!(outputs.contains("result=unknown\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_critical_issues_fail_when_requested() {
        let payload = json!({
            "status": "completed",
            "result": "issues_found",
            "issuesSummary": { "total": 4, "critical": 2 }
        });

        let h = harness(
            &["--fail-on-critical", "true"],
            ScriptedJobs::new(vec![Ok(payload.clone())]),
            RecordingComments::default(),
        );
        let report = h.agent.run().await.unwrap();
        assert_eq!(report.verdict, Err(RunFailure::CriticalIssues { count: 2 }));

        let h = harness(&[], ScriptedJobs::new(vec![Ok(payload)]), RecordingComments::default());
        let report = h.agent.run().await.unwrap();
        assert_eq!(report.verdict, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_is_fatal() {
        let h = harness(
            &[],
            ScriptedJobs::new(vec![Ok(json!({ "status": "failed" }))]),
            RecordingComments::default(),
        );

        let report = h.agent.run().await.unwrap();
        assert!(matches!(report.verdict, Err(RunFailure::RemoteFailed { .. })));
        assert!(h.comments.posted()[0].1.contains("❌ Visual Tests: Failed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_failure_does_not_change_verdict() {
        let h = harness(
            &[],
            ScriptedJobs::new(vec![Ok(json!({ "status": "completed", "result": "passed" }))]),
            RecordingComments::failing(),
        );

        let report = h.agent.run().await.unwrap();
        assert!(!report.comment_posted);
        assert_eq!(report.verdict, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_comment_disabled() {
        let h = harness(
            &["--comment-on-pr", "false"],
            ScriptedJobs::new(vec![Ok(json!({ "status": "completed", "result": "passed" }))]),
            RecordingComments::default(),
        );

        let report = h.agent.run().await.unwrap();
        assert!(!report.comment_posted);
        assert!(h.comments.posted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_failure_aborts_before_polling() {
        let h = harness(
            &[],
            ScriptedJobs::failing_trigger("API error (status 401): invalid api key"),
            RecordingComments::default(),
        );

        let err = h.agent.run().await.unwrap_err();
        assert!(format!("{:#}", err).contains("status 401"));
        assert_eq!(h.jobs.created().len(), 1);
        assert!(h.jobs.fetch_times().is_empty());
        assert!(h.comments.posted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_and_forget() {
        let h = harness(
            &["--wait-for-results", "false"],
            ScriptedJobs::new(vec![]),
            RecordingComments::default(),
        );

        let report = h.agent.run().await.unwrap();
        assert_eq!(report.status, None);
        assert_eq!(report.verdict, Ok(()));
        assert!(h.jobs.fetch_times().is_empty());

        let outputs = std::fs::read_to_string(&h.output_file).unwrap();
        assert!(outputs.contains("status=triggered\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_carries_change_and_filtered_config() {
        let h = harness(
            &["--browsers", "firefox,edge", "--viewports", "800x600,nope"],
            ScriptedJobs::new(vec![Ok(json!({ "status": "completed" }))]),
            RecordingComments::default(),
        );

        h.agent.run().await.unwrap();

        let created = h.jobs.created();
        assert_eq!(created[0].change.number, Some(7));
        assert_eq!(created[0].project_id, "proj-1");
        assert_eq!(created[0].config.browsers.len(), 1);
        assert_eq!(created[0].config.viewports.len(), 1);
    }
}
