//! Job domain types

use serde::{Deserialize, Serialize};

/// Status marker the service reports once a job finished successfully
pub const STATUS_COMPLETED: &str = "completed";

/// Status marker the service reports once a job gave up
pub const STATUS_FAILED: &str = "failed";

/// Handle to a triggered job
///
/// Created once by the trigger call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
    pub dashboard_url: String,
}

/// Job status as reported by the testing service
///
/// Only the two terminal markers carry meaning. Every other value is an
/// opaque in-progress state and is kept verbatim for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending(String),
    Completed,
    Failed,
}

impl JobStatus {
    /// Classifies a raw status string
    pub fn parse(raw: &str) -> Self {
        match raw {
            STATUS_COMPLETED => JobStatus::Completed,
            STATUS_FAILED => JobStatus::Failed,
            other => JobStatus::Pending(other.to_string()),
        }
    }

    /// Returns true for `completed` and `failed`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending(_))
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending(raw) => write!(f, "{}", raw),
            JobStatus::Completed => write!(f, "{}", STATUS_COMPLETED),
            JobStatus::Failed => write!(f, "{}", STATUS_FAILED),
        }
    }
}

/// Terminal state of the poll loop
///
/// Exactly one of these is produced per run and drives both the report
/// heading and the exit decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalStatus {
    /// The service reported `completed`
    Completed,

    /// The service reported `failed`, optionally with its own error detail
    Failed { error: Option<String> },

    /// No terminal status was observed before the deadline
    TimedOut,
}

impl FinalStatus {
    /// Value exposed on the `status` process output
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalStatus::Completed => STATUS_COMPLETED,
            FinalStatus::Failed { .. } => STATUS_FAILED,
            FinalStatus::TimedOut => "timeout",
        }
    }
}

impl std::fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terminal_markers() {
        assert_eq!(JobStatus::parse("completed"), JobStatus::Completed);
        assert_eq!(JobStatus::parse("failed"), JobStatus::Failed);
        assert!(JobStatus::parse("completed").is_terminal());
        assert!(JobStatus::parse("failed").is_terminal());
    }

    #[test]
    fn test_parse_anything_else_is_pending() {
        for raw in ["running", "queued", "", "COMPLETED", "analyzing"] {
            let status = JobStatus::parse(raw);
            assert!(!status.is_terminal(), "{raw:?} should not be terminal");
            assert_eq!(status.to_string(), raw);
        }
    }

    #[test]
    fn test_final_status_strings() {
        assert_eq!(FinalStatus::Completed.as_str(), "completed");
        assert_eq!(FinalStatus::Failed { error: None }.as_str(), "failed");
        assert_eq!(
            FinalStatus::Failed {
                error: Some("boom".to_string())
            }
            .to_string(),
            "failed"
        );
        assert_eq!(FinalStatus::TimedOut.to_string(), "timeout");
    }
}
