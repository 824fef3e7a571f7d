//! Job poller
//!
//! Waits for a triggered job to reach a terminal status. Each iteration
//! sleeps one interval and then issues one status read, so the first read
//! happens one interval after the trigger and reads never overlap.
//!
//! The deadline is checked at interval boundaries only. The loop never
//! starts a read once the deadline has passed, but a sleep that began
//! before the deadline may run past it by up to one interval.

use lumen_core::domain::job::{FinalStatus, JobStatus};
use lumen_core::domain::result::JobResult;
use tokio::time::{self, Duration, Instant};
use tracing::{debug, info, warn};

use crate::repository::JobRepository;

/// What the poll loop ended with
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub status: FinalStatus,
    /// Last terminal payload, or an empty result on timeout
    pub result: JobResult,
    /// Status reads issued, including failed ones
    pub requests: u32,
}

/// Polls a single job until it finishes or the deadline passes
pub struct JobPoller {
    interval: Duration,
    timeout: Duration,
}

impl JobPoller {
    /// Creates a new job poller
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Runs the poll loop for `job_id`
    ///
    /// Failed status reads are logged and the loop carries on; they do not
    /// end the wait early.
    pub async fn wait_for_completion(&self, jobs: &dyn JobRepository, job_id: &str) -> PollOutcome {
        info!(
            "Waiting for job {} (timeout: {:?}, interval: {:?})",
            job_id, self.timeout, self.interval
        );

        let start = Instant::now();
        let mut requests = 0;

        while start.elapsed() < self.timeout {
            time::sleep(self.interval).await;

            if start.elapsed() > self.timeout {
                debug!("Deadline passed during the last interval, not polling again");
                break;
            }

            requests += 1;
            let result = match jobs.fetch_job(job_id).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("Status check {} for job {} failed: {:#}", requests, job_id, e);
                    continue;
                }
            };

            let status = JobStatus::parse(&result.status);
            if !status.is_terminal() {
                debug!(
                    "Job {} is {} ({:?} elapsed)",
                    job_id,
                    if result.status.is_empty() { "pending".to_string() } else { status.to_string() },
                    start.elapsed()
                );
                continue;
            }

            match status {
                JobStatus::Completed => {
                    info!(
                        "Job {} completed after {:?} (result: {})",
                        job_id,
                        start.elapsed(),
                        result.result_label()
                    );
                    return PollOutcome {
                        status: FinalStatus::Completed,
                        result,
                        requests,
                    };
                }
                JobStatus::Failed => {
                    warn!(
                        "Job {} failed: {}",
                        job_id,
                        result.error.as_deref().unwrap_or("no details provided")
                    );
                    return PollOutcome {
                        status: FinalStatus::Failed {
                            error: result.error.clone(),
                        },
                        result,
                        requests,
                    };
                }
                JobStatus::Pending(_) => continue,
            }
        }

        warn!(
            "Job {} did not finish within {:?} ({} status checks)",
            job_id, self.timeout, requests
        );

        PollOutcome {
            status: FinalStatus::TimedOut,
            result: JobResult::default(),
            requests,
        }
    }
}
