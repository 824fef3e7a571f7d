//! Testing configuration sent with a trigger
//!
//! CI inputs arrive as loose comma-separated strings. They are validated
//! here, before anything goes over the wire: unknown browsers and test
//! types are dropped, malformed viewports are dropped, and the order of
//! the surviving entries is preserved.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Browsers the service can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
}

impl Browser {
    /// Parses a browser name, ignoring case and surrounding whitespace
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "chrome" => Some(Browser::Chrome),
            "firefox" => Some(Browser::Firefox),
            "safari" => Some(Browser::Safari),
            _ => None,
        }
    }
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Parses a `WIDTHxHEIGHT` token
    ///
    /// Both parts must be positive integers.
    pub fn parse(token: &str) -> Option<Self> {
        let (width, height) = token.trim().split_once(['x', 'X'])?;
        let width: u32 = width.trim().parse().ok()?;
        let height: u32 = height.trim().parse().ok()?;

        if width == 0 || height == 0 {
            return None;
        }

        Some(Self { width, height })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Test categories the service knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Visual,
    Interaction,
    Accessibility,
    Responsive,
    Performance,
}

impl TestType {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "visual" => Some(TestType::Visual),
            "interaction" => Some(TestType::Interaction),
            "accessibility" => Some(TestType::Accessibility),
            "responsive" => Some(TestType::Responsive),
            "performance" => Some(TestType::Performance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Visual => "visual",
            TestType::Interaction => "interaction",
            TestType::Accessibility => "accessibility",
            TestType::Responsive => "responsive",
            TestType::Performance => "performance",
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Testing breadth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Only the UI segments touched by the change
    #[default]
    PrChanges,
    /// Every page reachable from the target URL
    FullPage,
}

impl Scope {
    /// `pr-changes` selects the changed-surface mode, anything else is full page
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("pr-changes") {
            Scope::PrChanges
        } else {
            Scope::FullPage
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Scope::PrChanges => "Changed components",
            Scope::FullPage => "Full page",
        }
    }
}

/// Validated testing configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestingConfig {
    pub browsers: Vec<Browser>,
    pub viewports: Vec<Viewport>,
    pub test_types: Vec<TestType>,
    pub exclude_test_types: Vec<TestType>,
    pub scope: Scope,
}

impl TestingConfig {
    /// Builds a configuration from raw comma-separated inputs
    pub fn from_inputs(
        browsers: &str,
        viewports: &str,
        test_types: &str,
        exclude_test_types: &str,
        scope: &str,
    ) -> Self {
        Self {
            browsers: parse_browsers(browsers),
            viewports: parse_viewports(viewports),
            test_types: parse_test_types(test_types),
            exclude_test_types: parse_test_types(exclude_test_types),
            scope: Scope::parse(scope),
        }
    }
}

pub fn parse_browsers(raw: &str) -> Vec<Browser> {
    parse_list(raw, "browser", Browser::parse)
}

pub fn parse_viewports(raw: &str) -> Vec<Viewport> {
    parse_list(raw, "viewport", Viewport::parse)
}

pub fn parse_test_types(raw: &str) -> Vec<TestType> {
    parse_list(raw, "test type", TestType::parse)
}

fn parse_list<T>(raw: &str, what: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let parsed = parse(token);
            if parsed.is_none() {
                debug!("Dropping unsupported {} '{}'", what, token);
            }
            parsed
        })
        .collect()
}
