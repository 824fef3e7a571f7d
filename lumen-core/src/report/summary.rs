//! Workflow run summary

use crate::domain::job::FinalStatus;
use crate::domain::result::JobResult;

/// Renders the compact status table shown on the workflow run page
pub fn render_step_summary(status: &FinalStatus, result: &JobResult, dashboard_url: &str) -> String {
    let summary = result.issues_summary;

    format!(
        "## Visual Test Results\n\
         \n\
         | Status | Result | Total Issues | Critical |\n\
         |---|---|---|---|\n\
         | {} | {} | {} | {} |\n\
         \n\
         [View dashboard]({})\n",
        status,
        result.result_label(),
        summary.total,
        summary.critical,
        dashboard_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::IssuesSummary;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_step_summary_table() {
        let result = JobResult {
            status: "completed".to_string(),
            result: Some("passed".to_string()),
            issues_summary: IssuesSummary {
                total: 3,
                critical: 1,
                warning: 2,
                info: 0,
            },
            ..Default::default()
        };

        let text = render_step_summary(&FinalStatus::Completed, &result, "https://app.lumen.dev/jobs/t1");

        assert_eq!(
            text,
            "## Visual Test Results\n\
             \n\
             | Status | Result | Total Issues | Critical |\n\
             |---|---|---|---|\n\
             | completed | passed | 3 | 1 |\n\
             \n\
             [View dashboard](https://app.lumen.dev/jobs/t1)\n"
        );
    }

    #[test]
    fn test_step_summary_on_timeout_uses_defaults() {
        let text = render_step_summary(&FinalStatus::TimedOut, &JobResult::default(), "https://d/jobs/x");
        assert!(text.contains("| timeout | unknown | 0 | 0 |"));
    }
}
