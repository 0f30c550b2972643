//! Test reporting: result collection, summary, JUnit XML and per-test
//! artifacts.
//!
//! Results from every suite of a run go into one [`Reporter`]. The JUnit
//! file groups them back into one `<testsuite>` per suite and is named
//! after the run id so parallel runs never overwrite each other.

use crate::config::SuiteConfig;
use crate::console::ConsoleMessage;
use crate::file_ops::ensure_dir;
use crate::harness::AfterTest;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Individual test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Test name
    pub name: String,
    /// Suite the test belongs to
    pub suite: String,
    /// Test status
    pub status: TestStatus,
    /// Duration of test execution
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Screenshots and page sources saved for the test
    pub artifacts: Vec<PathBuf>,
    /// When the test completed
    pub timestamp: DateTime<Utc>,
}

impl TestResultEntry {
    fn new(suite: &str, name: &str, status: TestStatus, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            suite: suite.to_string(),
            status,
            duration,
            error: None,
            artifacts: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a passing test result
    #[must_use]
    pub fn passed(suite: &str, name: &str, duration: Duration) -> Self {
        Self::new(suite, name, TestStatus::Passed, duration)
    }

    /// Create a failing test result
    #[must_use]
    pub fn failed(suite: &str, name: &str, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(suite, name, TestStatus::Failed, duration)
        }
    }

    /// Create a skipped test result
    #[must_use]
    pub fn skipped(suite: &str, name: &str) -> Self {
        Self::new(suite, name, TestStatus::Skipped, Duration::ZERO)
    }

    /// Attach artifact paths
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<PathBuf>) -> Self {
        self.artifacts.extend(artifacts);
        self
    }
}

/// Collects results for one run
pub struct Reporter {
    name: String,
    run_id: Uuid,
    started: DateTime<Utc>,
    results: Vec<TestResultEntry>,
    listener: Option<Box<dyn FnMut(&TestResultEntry)>>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("name", &self.name)
            .field("run_id", &self.run_id)
            .field("started", &self.started)
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Create a reporter for a named run with a fresh run id
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run_id: Uuid::new_v4(),
            started: Utc::now(),
            results: Vec::new(),
            listener: None,
        }
    }

    /// Call `listener` with every recorded result
    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&TestResultEntry) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Run name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run id
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Record a test result
    pub fn record(&mut self, result: TestResultEntry) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&result);
        }
        self.results.push(result);
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped tests
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Get total test count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Get total duration
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Get test results
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Get failing tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// Suite names in first-seen order
    #[must_use]
    pub fn suites(&self) -> Vec<&str> {
        let mut suites: Vec<&str> = Vec::new();
        for result in &self.results {
            if !suites.contains(&result.suite.as_str()) {
                suites.push(&result.suite);
            }
        }
        suites
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passing, {} failing, {} skipped ({:.1}s)",
            self.name,
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        )
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuites name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        ));
        xml.push('\n');

        for suite in self.suites() {
            let cases: Vec<&TestResultEntry> = self.results.iter().filter(|r| r.suite == suite).collect();
            let failures = cases.iter().filter(|r| r.status.is_failed()).count();
            let skipped = cases.iter().filter(|r| r.status == TestStatus::Skipped).count();
            let time: f64 = cases.iter().map(|r| r.duration.as_secs_f64()).sum();
            let timestamp = cases
                .first()
                .map_or(self.started, |r| r.timestamp)
                .format("%Y-%m-%dT%H:%M:%S");
            xml.push_str(&format!(
                r#"  <testsuite name="{}" timestamp="{timestamp}" tests="{}" failures="{failures}" skipped="{skipped}" time="{time:.3}">"#,
                escape_xml(suite),
                cases.len(),
            ));
            xml.push('\n');

            for case in cases {
                xml.push_str(&format!(
                    r#"    <testcase classname="{}" name="{}" time="{:.3}">"#,
                    escape_xml(suite),
                    escape_xml(&case.name),
                    case.duration.as_secs_f64()
                ));
                xml.push('\n');
                match case.status {
                    TestStatus::Failed => {
                        let error = case.error.as_deref().unwrap_or_default();
                        xml.push_str(&format!(
                            r#"      <failure message="{}">{}</failure>"#,
                            escape_xml(error),
                            escape_xml(error)
                        ));
                        xml.push('\n');
                    }
                    TestStatus::Skipped => xml.push_str("      <skipped/>\n"),
                    TestStatus::Passed => {}
                }
                xml.push_str("    </testcase>\n");
            }
            xml.push_str("  </testsuite>\n");
        }
        xml.push_str("</testsuites>\n");
        xml
    }

    /// Write `<dir>/<prefix>-<run id>.xml`, creating `dir` as needed
    pub fn write_junit(&self, dir: impl AsRef<Path>, prefix: &str) -> SuiteResult<PathBuf> {
        let dir = dir.as_ref();
        ensure_dir(dir)?;
        let path = dir.join(format!("{prefix}-{}.xml", self.run_id));
        std::fs::write(&path, self.render_junit())?;
        tracing::info!(path = %path.display(), "wrote JUnit report");
        Ok(path)
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Make a suite or test title safe as a path component
#[must_use]
pub fn sanitize_component(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Artifacts
// ============================================================================

/// Default budget for one artifact capture
pub const DEFAULT_ARTIFACT_TIMEOUT_MS: u64 = 10_000;

/// Saves screenshots, page sources and console logs under
/// `<root>/<suite>/<test>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStore {
    root: PathBuf,
    timeout: Duration,
}

impl ArtifactStore {
    /// Store rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: Duration::from_millis(DEFAULT_ARTIFACT_TIMEOUT_MS),
        }
    }

    /// Store for a configuration's artifact directory and capture budget
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(config.artifacts_dir.clone()).with_timeout_ms(config.artifact_timeout_ms)
    }

    /// Set the budget for each capture
    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout = Duration::from_millis(ms);
        self
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Capture budget
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Directory for one test
    #[must_use]
    pub fn dir_for(&self, suite: &str, test: &str) -> PathBuf {
        self.root
            .join(sanitize_component(suite))
            .join(sanitize_component(test))
    }

    /// Write one artifact file for a test
    pub fn save(&self, suite: &str, test: &str, file: &str, bytes: &[u8]) -> SuiteResult<PathBuf> {
        let dir = self.dir_for(suite, test);
        ensure_dir(&dir)?;
        let path = dir.join(file);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Write `console.json`; nothing is written for an empty log
    pub fn save_console(&self, suite: &str, test: &str, messages: &[ConsoleMessage]) -> SuiteResult<Option<PathBuf>> {
        if messages.is_empty() {
            return Ok(None);
        }
        let json = serde_json::to_string_pretty(messages)?;
        self.save(suite, test, "console.json", json.as_bytes()).map(Some)
    }

    /// Run one capture within the budget
    pub async fn capture<T, F>(&self, what: &str, capture: F) -> SuiteResult<T>
    where
        F: Future<Output = SuiteResult<T>>,
    {
        match tokio::time::timeout(self.timeout, capture).await {
            Ok(result) => result,
            Err(_) => Err(SuiteError::timeout(
                self.timeout.as_millis() as u64,
                format!("{what} capture did not complete"),
            )),
        }
    }
}

/// Screenshot on failure; page source and console log always
#[async_trait(?Send)]
impl AfterTest<Session> for ArtifactStore {
    async fn after_test(&self, session: &mut Session, suite: &str, test: &str, passed: bool) -> Vec<PathBuf> {
        let mut saved = Vec::new();
        if !passed {
            match self.capture("screenshot", session.screenshot()).await {
                Ok(png) => match self.save(suite, test, "screenshot.png", &png) {
                    Ok(path) => saved.push(path),
                    Err(e) => tracing::warn!(error = %e, "could not save screenshot"),
                },
                Err(e) => tracing::warn!(error = %e, "could not take screenshot"),
            }
        }
        match self.capture("page source", session.page_source()).await {
            Ok(html) => match self.save(suite, test, "page-source.html", html.as_bytes()) {
                Ok(path) => saved.push(path),
                Err(e) => tracing::warn!(error = %e, "could not save page source"),
            },
            Err(e) => tracing::warn!(error = %e, "could not read page source"),
        }
        match self.save_console(suite, test, &session.console().drain()) {
            Ok(Some(path)) => saved.push(path),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not save console log"),
        }
        saved
    }
}
