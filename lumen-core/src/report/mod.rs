//! Report rendering
//!
//! Turns a terminal job result into the two text artifacts the agent
//! publishes: a markdown comment for the pull request thread and a short
//! status table for the workflow run summary.
//!
//! Rendering is a pure function of its inputs. Rendering the same result
//! twice yields byte-identical text.

mod comment;
mod summary;

pub use comment::{MAX_ISSUE_ROWS, render_comment};
pub use summary::render_step_summary;

use crate::domain::testing::{Scope, TestType};

/// Longest title embedded in a report, in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Longest description embedded in a report, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// Inputs known at render time that are not part of the job result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub target_url: String,
    pub dashboard_url: String,
    pub scope: Scope,
    pub test_types: Vec<TestType>,
    pub run_number: Option<u64>,
}

/// Shortens `text` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Makes arbitrary text safe to place inside a markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// Encodes the characters that would end a markdown link target or a table cell
fn link_target(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.trim().chars() {
        match c {
            '|' => out.push_str("%7C"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            '<' => out.push_str("%3C"),
            '>' => out.push_str("%3E"),
            c if c.is_whitespace() => out.push_str("%20"),
            c => out.push(c),
        }
    }
    out
}

fn title(text: Option<&str>, fallback: &str) -> String {
    cell(&truncate(text.unwrap_or(fallback), MAX_TITLE_CHARS))
}

fn description(text: Option<&str>) -> String {
    cell(&truncate(text.unwrap_or(""), MAX_DESCRIPTION_CHARS))
}

/// Groups items by key, keeping groups and items in first-seen order
fn group_in_order<'a, T>(items: &'a [T], key: impl Fn(&T) -> String) -> Vec<(String, Vec<&'a T>)> {
    let mut groups: Vec<(String, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }

    groups
}
