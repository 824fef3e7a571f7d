//! Pull request comment

use std::fmt::{self, Write};

use super::{RenderContext, cell, description, group_in_order, link_target, title};
use crate::domain::job::FinalStatus;
use crate::domain::result::{
    CodeAnalysis, Discovery, Issue, JobResult, Scenario, SegmentScreenshot, TestOverview,
};
use crate::domain::testing::Scope;

/// Rows shown in the issues table before the overflow note
pub const MAX_ISSUE_ROWS: usize = 10;

struct Heading {
    emoji: &'static str,
    title: &'static str,
    summary: String,
}

/// Renders the markdown body posted to the pull request
///
/// Sections backed by empty data are omitted entirely.
pub fn render_comment(
    status: &FinalStatus,
    result: &JobResult,
    ctx: &RenderContext,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let heading = heading(status, result);
    writeln!(out, "## {} Visual Tests: {}", heading.emoji, heading.title)?;
    writeln!(out)?;
    writeln!(out, "{}", heading.summary)?;
    writeln!(out)?;

    write_overview(&mut out, result, ctx)?;
    writeln!(out, "[View full report on the dashboard]({})", ctx.dashboard_url)?;

    if let Some(overview) = result.test_overview.as_ref().filter(|o| !o.is_empty()) {
        write_test_overview(&mut out, overview)?;
    }
    if ctx.scope == Scope::PrChanges && !result.screenshots.is_empty() {
        write_segment_screenshots(&mut out, &result.screenshots)?;
    }
    if let Some(discovery) = result.discovery.as_ref().filter(|d| !d.pages.is_empty()) {
        write_discovery(&mut out, discovery)?;
    }
    if let Some(analysis) = result.code_analysis.as_ref().filter(|a| !a.is_empty()) {
        write_code_analysis(&mut out, analysis)?;
    }
    if !result.functional_tests.is_empty() {
        write_scenarios(
            &mut out,
            "⚙️ Functional Tests",
            &result.functional_tests,
            |s| s.feature.clone().unwrap_or_else(|| "General".to_string()),
        )?;
    }
    if !result.interaction_tests.is_empty() {
        write_scenarios(
            &mut out,
            "🖱️ Interaction Tests",
            &result.interaction_tests,
            |s| s.behavior_type.clone().unwrap_or_else(|| "Other".to_string()),
        )?;
    }
    if !result.issues.is_empty() {
        write_issues(&mut out, &result.issues, &ctx.dashboard_url)?;
    }

    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "<sub>Generated by Lumen visual testing</sub>")?;

    Ok(out)
}

/// Chooses the banner: timeout, then passed, then critical, then any issues
fn heading(status: &FinalStatus, result: &JobResult) -> Heading {
    let summary = result.issues_summary;

    if *status == FinalStatus::TimedOut {
        return Heading {
            emoji: "⏱️",
            title: "Timed Out",
            summary: "The test run did not finish in time. Results may still appear on the dashboard."
                .to_string(),
        };
    }

    if result.passed() {
        return Heading {
            emoji: "✅",
            title: "Passed",
            summary: "No visual regressions were detected.".to_string(),
        };
    }

    if summary.critical > 0 {
        return Heading {
            emoji: "🚨",
            title: "Critical Issues Found",
            summary: format!(
                "Found {} critical {} out of {} total.",
                summary.critical,
                plural(summary.critical, "issue", "issues"),
                summary.total
            ),
        };
    }

    if summary.total > 0 {
        return Heading {
            emoji: "⚠️",
            title: "Issues Found",
            summary: format!(
                "Found {} {} to review.",
                summary.total,
                plural(summary.total, "issue", "issues")
            ),
        };
    }

    let detail = match status {
        FinalStatus::Failed { error: Some(error) } => Some(error.as_str()),
        _ => result.error.as_deref(),
    };

    Heading {
        emoji: "❌",
        title: "Failed",
        summary: match detail {
            Some(error) => format!("The test run failed: {}", description(Some(error))),
            None => "The test run did not complete successfully.".to_string(),
        },
    }
}

fn write_overview(out: &mut String, result: &JobResult, ctx: &RenderContext) -> fmt::Result {
    let summary = result.issues_summary;

    writeln!(out, "| | |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| **Preview URL** | {} |", cell(&ctx.target_url))?;
    writeln!(out, "| **Total Issues** | {} |", summary.total)?;
    writeln!(out, "| **Critical** | {} |", summary.critical)?;
    writeln!(out, "| **Warnings** | {} |", summary.warning)?;
    writeln!(out, "| **Info** | {} |", summary.info)?;
    writeln!(
        out,
        "| **Components Affected** | {} |",
        result.affected_components.len()
    )?;
    writeln!(out, "| **Scope** | {} |", ctx.scope.label())?;

    if !ctx.test_types.is_empty() {
        let types: Vec<&str> = ctx.test_types.iter().map(|t| t.as_str()).collect();
        writeln!(out, "| **Test Types** | {} |", types.join(", "))?;
    }
    if let Some(run) = ctx.run_number {
        writeln!(out, "| **Run** | #{} |", run)?;
    }
    if let Some(duration) = result.duration() {
        writeln!(out, "| **Duration** | {} |", format_duration(duration))?;
    }

    writeln!(out)
}

fn write_test_overview(out: &mut String, overview: &TestOverview) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### 🧪 Test Overview")?;

    if !overview.features.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Features discovered**")?;
        writeln!(out)?;
        for feature in &overview.features {
            match feature.description.as_deref().filter(|d| !d.is_empty()) {
                Some(desc) => writeln!(
                    out,
                    "- **{}**: {}",
                    title(feature.name.as_deref(), "Unnamed feature"),
                    description(Some(desc))
                )?,
                None => writeln!(
                    out,
                    "- **{}**",
                    title(feature.name.as_deref(), "Unnamed feature")
                )?,
            }
        }
    }

    if !overview.form_submissions.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Form submissions**")?;
        writeln!(out)?;
        writeln!(out, "| Form | Result | Details |")?;
        writeln!(out, "|---|---|---|")?;
        for form in &overview.form_submissions {
            writeln!(
                out,
                "| {} | {} | {} |",
                title(form.form.as_deref(), "Form"),
                if form.success { "✅ Submitted" } else { "❌ Failed" },
                description(form.message.as_deref())
            )?;
        }
    }

    if !overview.tests_executed.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Tests executed**")?;
        writeln!(out)?;
        for test in &overview.tests_executed {
            write!(
                out,
                "- {} {}",
                status_icon(test.status.as_deref()),
                title(test.name.as_deref(), "Unnamed test")
            )?;
            match test.kind.as_deref() {
                Some(kind) => writeln!(out, " (`{}`)", title(Some(kind), ""))?,
                None => writeln!(out)?,
            }
        }
    }

    Ok(())
}

fn write_segment_screenshots(out: &mut String, screenshots: &[SegmentScreenshot]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### 📸 Changed Components")?;

    let groups = group_in_order(screenshots, |s| {
        s.component.clone().unwrap_or_else(|| "Unknown component".to_string())
    });

    for (component, shots) in groups {
        writeln!(out)?;
        writeln!(out, "<details>")?;
        writeln!(
            out,
            "<summary><b>{}</b> ({} {})</summary>",
            title(Some(&component), ""),
            shots.len(),
            plural(shots.len() as u64, "screenshot", "screenshots")
        )?;
        writeln!(out)?;
        writeln!(out, "| Browser | Viewport | Screenshot |")?;
        writeln!(out, "|---|---|---|")?;
        for shot in shots {
            writeln!(
                out,
                "| {} | {} | {} |",
                title(shot.browser.as_deref(), "-"),
                title(shot.viewport.as_deref(), "-"),
                link("View", shot.url.as_deref())
            )?;
        }
        writeln!(out)?;
        writeln!(out, "</details>")?;
    }

    Ok(())
}

fn write_discovery(out: &mut String, discovery: &Discovery) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### 🗺️ Discovered Pages")?;
    writeln!(out)?;
    writeln!(out, "| Page | Screenshot |")?;
    writeln!(out, "|---|---|")?;

    for page in &discovery.pages {
        let name = title(
            page.title.as_deref().or(page.url.as_deref()),
            "Untitled page",
        );
        let page_cell = match page.url.as_deref() {
            Some(url) => format!("[{}]({})", name, link_target(url)),
            None => name,
        };
        writeln!(
            out,
            "| {} | {} |",
            page_cell,
            link("View", page.screenshot_url.as_deref())
        )?;
    }

    Ok(())
}

fn write_code_analysis(out: &mut String, analysis: &CodeAnalysis) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### 🔍 Code Analysis")?;

    if let Some(summary) = analysis.summary.as_deref().filter(|s| !s.is_empty()) {
        writeln!(out)?;
        writeln!(out, "{}", description(Some(summary)))?;
    }

    if !analysis.findings.is_empty() {
        writeln!(out)?;
        for finding in &analysis.findings {
            let location = match (finding.file.as_deref(), finding.line) {
                (Some(file), Some(line)) => format!(" `{}:{}`", title(Some(file), ""), line),
                (Some(file), None) => format!(" `{}`", title(Some(file), "")),
                _ => String::new(),
            };
            writeln!(
                out,
                "- {}{}: {}",
                severity_icon(finding.severity.as_deref()),
                location,
                description(finding.message.as_deref())
            )?;
        }
    }

    Ok(())
}

fn write_scenarios(
    out: &mut String,
    section: &str,
    scenarios: &[Scenario],
    group_key: impl Fn(&Scenario) -> String,
) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### {}", section)?;

    for (group, members) in group_in_order(scenarios, group_key) {
        writeln!(out)?;
        writeln!(out, "#### {}", title(Some(&group), ""))?;
        for scenario in members {
            write_scenario(out, scenario)?;
        }
    }

    Ok(())
}

fn write_scenario(out: &mut String, scenario: &Scenario) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "<details>")?;
    writeln!(
        out,
        "<summary>{} {}</summary>",
        status_icon(scenario.status.as_deref()),
        title(scenario.name.as_deref(), "Unnamed scenario")
    )?;

    if !scenario.steps.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Steps**")?;
        writeln!(out)?;
        for (i, step) in scenario.steps.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, description(Some(step)))?;
        }
    }

    if !scenario.failed_assertions.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Failed assertions**")?;
        writeln!(out)?;
        for assertion in &scenario.failed_assertions {
            writeln!(out, "- ❌ {}", description(Some(assertion)))?;
        }
    }

    if !scenario.network_calls.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Network calls**")?;
        writeln!(out)?;
        writeln!(out, "| Method | URL | Status |")?;
        writeln!(out, "|---|---|---|")?;
        for call in &scenario.network_calls {
            writeln!(
                out,
                "| {} | {} | {} |",
                title(call.method.as_deref(), "-"),
                description(call.url.as_deref()),
                call.status.map_or_else(|| "-".to_string(), |s| s.to_string())
            )?;
        }
    }

    if let Some(url) = scenario.screenshot_url.as_deref() {
        writeln!(out)?;
        writeln!(out, "**Screenshot:** [View]({})", link_target(url))?;
    }

    if !scenario.issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Issues**")?;
        writeln!(out)?;
        for issue in &scenario.issues {
            writeln!(
                out,
                "- {} {}: {}",
                severity_icon(issue.severity.as_deref()),
                title(issue.title.as_deref(), "Untitled issue"),
                description(issue.description.as_deref())
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "</details>")
}

fn write_issues(out: &mut String, issues: &[Issue], dashboard_url: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "### 🐛 Issues")?;
    writeln!(out)?;
    writeln!(out, "| Severity | Issue | Component | Details |")?;
    writeln!(out, "|---|---|---|---|")?;

    for issue in issues.iter().take(MAX_ISSUE_ROWS) {
        writeln!(
            out,
            "| {} {} | {} | {} | {} |",
            severity_icon(issue.severity.as_deref()),
            title(issue.severity.as_deref(), "unknown"),
            title(issue.title.as_deref(), "Untitled issue"),
            title(issue.component.as_deref(), "-"),
            description(issue.description.as_deref())
        )?;
    }

    if issues.len() > MAX_ISSUE_ROWS {
        writeln!(out)?;
        writeln!(
            out,
            "_...and {} more. See the [dashboard]({}) for the full list._",
            issues.len() - MAX_ISSUE_ROWS,
            dashboard_url
        )?;
    }

    Ok(())
}

fn link(label: &str, url: Option<&str>) -> String {
    match url {
        Some(url) if !url.trim().is_empty() => format!("[{}]({})", label, link_target(url)),
        _ => "-".to_string(),
    }
}

fn status_icon(status: Option<&str>) -> &'static str {
    match status {
        Some("passed") | Some("success") => "✅",
        Some("failed") | Some("error") => "❌",
        Some("skipped") => "⏭️",
        _ => "⚪",
    }
}

fn severity_icon(severity: Option<&str>) -> &'static str {
    match severity {
        Some("critical") => "🔴",
        Some("warning") => "🟡",
        Some("info") => "🔵",
        _ => "⚪",
    }
}

fn plural(count: u64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

fn format_duration(duration: chrono::Duration) -> String {
    let secs = duration.num_seconds();
    match (secs / 3600, (secs % 3600) / 60, secs % 60) {
        (0, 0, s) => format!("{}s", s),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, m, _) => format!("{}h {}m", h, m),
    }
}
