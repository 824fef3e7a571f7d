//! Triggering event
//!
//! Reads the pull request the workflow was started for from the event
//! payload the runner writes to `GITHUB_EVENT_PATH`.

use anyhow::{Context, Result};
use lumen_core::dto::job::ChangeMetadata;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    title: Option<String>,
    html_url: Option<String>,
    user: Option<User>,
    head: Option<GitRef>,
    base: Option<GitRef>,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: Option<String>,
    sha: Option<String>,
}

/// Loads change metadata for the current run
///
/// Without an event file, or for events that are not about a pull request,
/// only the commit and branch from the runner context are known.
pub fn load_change(
    event_path: Option<&Path>,
    sha: Option<&str>,
    ref_name: Option<&str>,
) -> Result<ChangeMetadata> {
    let fallback = ChangeMetadata {
        source_branch: ref_name.map(str::to_string),
        commit_sha: sha.map(str::to_string),
        ..Default::default()
    };

    let Some(path) = event_path else {
        debug!("No event payload available, using runner context only");
        return Ok(fallback);
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;

    match change_from_event(&raw)? {
        Some(change) => {
            info!(
                "Testing pull request #{} ({})",
                change.number.unwrap_or_default(),
                change.source_branch.as_deref().unwrap_or("unknown branch")
            );
            Ok(change)
        }
        None => {
            info!("Event is not a pull request, comment will be skipped");
            Ok(fallback)
        }
    }
}

/// Extracts pull request metadata from an event payload
fn change_from_event(raw: &str) -> Result<Option<ChangeMetadata>> {
    let payload: EventPayload =
        serde_json::from_str(raw).context("Failed to parse event payload")?;

    Ok(payload.pull_request.map(|pr| ChangeMetadata {
        number: Some(pr.number),
        title: pr.title,
        url: pr.html_url,
        author: pr.user.map(|u| u.login),
        source_branch: pr.head.as_ref().and_then(|h| h.name.clone()),
        target_branch: pr.base.and_then(|b| b.name),
        commit_sha: pr.head.and_then(|h| h.sha),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PR_EVENT: &str = r#"{
        "action": "synchronize",
        "number": 7,
        "pull_request": {
            "number": 7,
            "title": "Redesign checkout",
            "html_url": "https://github.com/acme/storefront/pull/7",
            "user": { "login": "octocat" },
            "head": { "ref": "feature/checkout", "sha": "abc123" },
            "base": { "ref": "main", "sha": "def456" }
        }
    }"#;

    #[test]
    fn test_pull_request_event() {
        let change = change_from_event(PR_EVENT).unwrap().unwrap();
        assert_eq!(change.number, Some(7));
        assert_eq!(change.title.as_deref(), Some("Redesign checkout"));
        assert_eq!(change.author.as_deref(), Some("octocat"));
        assert_eq!(change.source_branch.as_deref(), Some("feature/checkout"));
        assert_eq!(change.target_branch.as_deref(), Some("main"));
        assert_eq!(change.commit_sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_push_event_has_no_pull_request() {
        let raw = r#"{ "ref": "refs/heads/main", "after": "abc" }"#;
        assert!(change_from_event(raw).unwrap().is_none());
    }

    #[test]
    fn test_invalid_payload_is_an_error() {
        assert!(change_from_event("not json").is_err());
    }

    #[test]
    fn test_load_change_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PR_EVENT.as_bytes()).unwrap();

        let change = load_change(Some(file.path()), Some("zzz"), Some("ignored")).unwrap();
        assert_eq!(change.number, Some(7));
        assert_eq!(change.commit_sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_load_change_without_event_uses_runner_context() {
        let change = load_change(None, Some("abc"), Some("main")).unwrap();
        assert_eq!(change.number, None);
        assert_eq!(change.commit_sha.as_deref(), Some("abc"));
        assert_eq!(change.source_branch.as_deref(), Some("main"));
    }
}
