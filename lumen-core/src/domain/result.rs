//! Terminal result payload
//!
//! The testing service returns a large, loosely specified document once a
//! job reaches a terminal status. Every part of it is optional: sub-reports
//! appear only for the test categories that actually ran, and the exact
//! shape evolves on the service side. [`JobResult::from_value`] therefore
//! reads each top-level field on its own and falls back to that field's
//! default when it is missing, `null` or of an unexpected shape. Fields of
//! the nested sub-reports follow the same rule, so one bad value inside a
//! scenario never drops the scenario.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Result label used when the service did not provide one
pub const UNKNOWN_RESULT: &str = "unknown";

/// Result label the service uses for a clean run
pub const RESULT_PASSED: &str = "passed";

/// Parsed job status payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobResult {
    pub status: String,
    pub result: Option<String>,
    pub error: Option<String>,
    pub issues_summary: IssuesSummary,
    pub affected_components: Vec<AffectedComponent>,
    pub issues: Vec<Issue>,
    pub screenshots: Vec<SegmentScreenshot>,
    pub discovery: Option<Discovery>,
    pub test_overview: Option<TestOverview>,
    pub code_analysis: Option<CodeAnalysis>,
    pub functional_tests: Vec<Scenario>,
    pub interaction_tests: Vec<Scenario>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Issue counters, all defaulting to zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssuesSummary {
    pub total: u64,
    pub critical: u64,
    pub warning: u64,
    pub info: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AffectedComponent {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
}

/// A single issue found by the service
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub component: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub browser: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub viewport: Option<String>,
}

/// Screenshot of one component in one browser/viewport combination
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmentScreenshot {
    #[serde(deserialize_with = "lenient")]
    pub component: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub browser: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub viewport: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// Pages found while crawling the target in full-page scope
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Discovery {
    #[serde(deserialize_with = "lenient_items")]
    pub pages: Vec<DiscoveredPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveredPage {
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub screenshot_url: Option<String>,
}

/// What the service learned about the application and what it executed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestOverview {
    #[serde(deserialize_with = "lenient_items")]
    pub features: Vec<Feature>,
    #[serde(deserialize_with = "lenient_items")]
    pub form_submissions: Vec<FormSubmission>,
    #[serde(deserialize_with = "lenient_items")]
    pub tests_executed: Vec<ExecutedTest>,
}

impl TestOverview {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.form_submissions.is_empty() && self.tests_executed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Feature {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormSubmission {
    #[serde(deserialize_with = "lenient")]
    pub form: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub success: bool,
    #[serde(deserialize_with = "lenient")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExecutedTest {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
}

/// Static analysis notes on the changed source
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CodeAnalysis {
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub findings: Vec<Finding>,
}

impl CodeAnalysis {
    pub fn is_empty(&self) -> bool {
        self.summary.as_deref().is_none_or(str::is_empty) && self.findings.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Finding {
    #[serde(deserialize_with = "lenient")]
    pub file: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub line: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub severity: Option<String>,
}

/// One functional or interaction test scenario
///
/// Functional scenarios are grouped by `feature`, interaction scenarios by
/// `behavior_type`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scenario {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub feature: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub behavior_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub steps: Vec<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub failed_assertions: Vec<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub network_calls: Vec<NetworkCall>,
    #[serde(deserialize_with = "lenient")]
    pub screenshot_url: Option<String>,
    #[serde(deserialize_with = "lenient_items")]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkCall {
    #[serde(deserialize_with = "lenient")]
    pub method: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub status: Option<u16>,
}

impl JobResult {
    /// Reads a status payload, defaulting every field that is absent or malformed
    ///
    /// The payload must already be unwrapped from any response envelope.
    pub fn from_value(payload: &Value) -> Self {
        Self {
            status: field::<Option<String>>(payload, "status").unwrap_or_default(),
            result: field(payload, "result"),
            error: field(payload, "error"),
            issues_summary: IssuesSummary::from_value(payload.get("issuesSummary")),
            affected_components: items(payload, "affectedComponents"),
            issues: items(payload, "issues"),
            screenshots: items(payload, "screenshots"),
            discovery: field(payload, "discovery"),
            test_overview: field(payload, "testOverview"),
            code_analysis: field(payload, "codeAnalysis"),
            functional_tests: items(payload, "functionalTests"),
            interaction_tests: items(payload, "interactionTests"),
            started_at: field(payload, "startedAt"),
            completed_at: field(payload, "completedAt"),
        }
    }

    /// Result label, `"unknown"` when the service sent none
    pub fn result_label(&self) -> &str {
        self.result.as_deref().unwrap_or(UNKNOWN_RESULT)
    }

    pub fn passed(&self) -> bool {
        self.result.as_deref() == Some(RESULT_PASSED)
    }

    /// Wall-clock run time when the service reported both timestamps
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) if end >= start => Some(end - start),
            _ => None,
        }
    }
}

impl IssuesSummary {
    fn from_value(value: Option<&Value>) -> Self {
        let count = |key: &str| {
            value
                .and_then(|summary| summary.get(key))
                .and_then(Value::as_u64)
                .unwrap_or(0)
        };

        Self {
            total: count("total"),
            critical: count("critical"),
            warning: count("warning"),
            info: count("info"),
        }
    }
}

/// Deserializes a single field, falling back to its default
fn field<T: DeserializeOwned + Default>(payload: &Value, key: &str) -> T {
    payload
        .get(key)
        .map(|value| value_or_default(value, key))
        .unwrap_or_default()
}

/// Deserializes an array field item by item, dropping items that do not parse
fn items<T: DeserializeOwned>(payload: &Value, key: &str) -> Vec<T> {
    payload
        .get(key)
        .map(|value| items_of(value, key))
        .unwrap_or_default()
}

fn value_or_default<T: DeserializeOwned + Default>(value: &Value, key: &str) -> T {
    if value.is_null() {
        return T::default();
    }

    T::deserialize(value).unwrap_or_else(|e| {
        debug!("Ignoring malformed `{}` in job result: {}", key, e);
        T::default()
    })
}

fn items_of<T: DeserializeOwned>(value: &Value, key: &str) -> Vec<T> {
    let Value::Array(values) = value else {
        return Vec::new();
    };

    values
        .iter()
        .filter_map(|value| match T::deserialize(value) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Dropping malformed `{}` entry in job result: {}", key, e);
                None
            }
        })
        .collect()
}

/// Field-level counterpart of [`field`] for nested sub-report structs
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_or_default(&value, "nested field"))
}

/// Field-level counterpart of [`items`] for nested sub-report lists
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(items_of(&value, "nested list"))
}
