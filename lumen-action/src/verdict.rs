//! Exit decision
//!
//! Maps the terminal state of a run onto success or a single failure
//! message. Non-critical issues never fail a run.

use lumen_core::domain::job::FinalStatus;
use lumen_core::domain::result::JobResult;
use thiserror::Error;

/// Reasons a finished run fails the workflow step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunFailure {
    #[error("Visual tests timed out after {seconds}s without a result")]
    TimedOut { seconds: u64 },

    #[error("Visual tests failed: {detail}")]
    RemoteFailed { detail: String },

    #[error("Visual tests found {count} critical issue(s)")]
    CriticalIssues { count: u64 },
}

/// Decides whether the run succeeded
///
/// Checked in order: timeout, remote failure, then critical issues when
/// `fail_on_critical` is set.
pub fn decide(
    status: &FinalStatus,
    result: &JobResult,
    fail_on_critical: bool,
    timeout_secs: u64,
) -> Result<(), RunFailure> {
    match status {
        FinalStatus::TimedOut => Err(RunFailure::TimedOut {
            seconds: timeout_secs,
        }),
        FinalStatus::Failed { error } => Err(RunFailure::RemoteFailed {
            detail: error
                .clone()
                .unwrap_or_else(|| "the service reported a failure without details".to_string()),
        }),
        FinalStatus::Completed if fail_on_critical && result.issues_summary.critical > 0 => {
            Err(RunFailure::CriticalIssues {
                count: result.issues_summary.critical,
            })
        }
        FinalStatus::Completed => Ok(()),
    }
}
