//! Step outputs and run summary
//!
//! Both sinks are files the runner hands us through `GITHUB_OUTPUT` and
//! `GITHUB_STEP_SUMMARY`. Outside a runner they are unset and writes are
//! skipped.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for the runner's output files
#[derive(Debug, Clone, Default)]
pub struct ActionOutputs {
    output_file: Option<PathBuf>,
    summary_file: Option<PathBuf>,
}

impl ActionOutputs {
    pub fn new(output_file: Option<PathBuf>, summary_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            summary_file,
        }
    }

    /// Appends `key=value` lines for downstream steps
    ///
    /// Line breaks in values are flattened so each output stays on one line.
    pub fn set_all(&self, pairs: &[(&str, String)]) -> Result<()> {
        let Some(path) = &self.output_file else {
            debug!("GITHUB_OUTPUT not set, skipping {} output(s)", pairs.len());
            return Ok(());
        };

        let mut lines = String::new();
        for (key, value) in pairs {
            lines.push_str(key);
            lines.push('=');
            lines.push_str(&value.replace(['\r', '\n'], " "));
            lines.push('\n');
        }

        append(path, &lines).context("Failed to write step outputs")
    }

    /// Appends markdown to the run summary
    pub fn append_summary(&self, markdown: &str) -> Result<()> {
        let Some(path) = &self.summary_file else {
            debug!("GITHUB_STEP_SUMMARY not set, skipping run summary");
            return Ok(());
        };

        append(path, markdown).context("Failed to write run summary")
    }
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    file.write_all(text.as_bytes())
        .with_context(|| format!("Failed to append to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "earlier=1\n").unwrap();

        let outputs = ActionOutputs::new(Some(path.clone()), None);
        outputs
            .set_all(&[("job_id", "t1".to_string()), ("status", "completed".to_string())])
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "earlier=1\njob_id=t1\nstatus=completed\n");
    }

    #[test]
    fn test_output_values_stay_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");

        let outputs = ActionOutputs::new(Some(path.clone()), None);
        outputs.set_all(&[("result", "a\nb".to_string())]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "result=a b\n");
    }

    #[test]
    fn test_summary_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        let outputs = ActionOutputs::new(None, Some(path.clone()));
        outputs.append_summary("## One\n").unwrap();
        outputs.append_summary("## Two\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## One\n## Two\n");
    }

    #[test]
    fn test_unset_sinks_are_skipped() {
        let outputs = ActionOutputs::default();
        assert!(outputs.set_all(&[("job_id", "t1".to_string())]).is_ok());
        assert!(outputs.append_summary("ignored").is_ok());
    }
}
