//! Test harness for running test suites.
//!
//! A suite is an ordered list of async cases over one mutable context: a
//! [`Session`](crate::session::Session) for the browser suites or a
//! [`BookStoreClient`](crate::api::BookStoreClient) for the API suite. Cases
//! run one after another with a per-test timeout, mocha-style `before` and
//! `after` hooks, a title filter and bail.

use crate::config::SuiteConfig;
use crate::reporter::{Reporter, TestResultEntry};
use crate::result::{SuiteError, SuiteResult};
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Per-test timeout when none is configured
pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 60_000;

/// Future returned by a case or hook
pub type CaseFuture<'a> = LocalBoxFuture<'a, SuiteResult<()>>;

/// A case or hook body
pub type CaseFn<C> = for<'a> fn(&'a mut C) -> CaseFuture<'a>;

fn pending_body<C>(_context: &mut C) -> CaseFuture<'_> {
    Box::pin(async { Ok(()) })
}

/// A single test case
pub struct TestCase<C> {
    /// Test name
    pub name: String,
    run: CaseFn<C>,
    pending: bool,
}

impl<C> TestCase<C> {
    /// Create a test case
    #[must_use]
    pub fn new(name: impl Into<String>, run: CaseFn<C>) -> Self {
        Self {
            name: name.into(),
            run,
            pending: false,
        }
    }

    /// A case that is listed but always reported as skipped
    #[must_use]
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: pending_body::<C>,
            pending: true,
        }
    }

    /// Whether the case is pending
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

impl<C> fmt::Debug for TestCase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// A test suite containing multiple tests
pub struct TestSuite<C> {
    /// Suite name
    pub name: String,
    before: Option<CaseFn<C>>,
    after: Option<CaseFn<C>>,
    tests: Vec<TestCase<C>>,
}

impl<C> TestSuite<C> {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before: None,
            after: None,
            tests: Vec::new(),
        }
    }

    /// Hook run once before the first case
    #[must_use]
    pub fn with_before(mut self, hook: CaseFn<C>) -> Self {
        self.before = Some(hook);
        self
    }

    /// Hook run once after the last case
    #[must_use]
    pub fn with_after(mut self, hook: CaseFn<C>) -> Self {
        self.after = Some(hook);
        self
    }

    /// Append a case
    #[must_use]
    pub fn case(mut self, name: impl Into<String>, run: CaseFn<C>) -> Self {
        self.tests.push(TestCase::new(name, run));
        self
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase<C>) {
        self.tests.push(test);
    }

    /// Cases in run order
    #[must_use]
    pub fn tests(&self) -> &[TestCase<C>] {
        &self.tests
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }
}

impl<C> fmt::Debug for TestSuite<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("tests", &self.tests)
            .finish()
    }
}

/// Hook run after every case, with the case outcome.
///
/// Returns the paths of any artifacts it saved so they end up on the
/// result entry. It must not fail the case.
#[async_trait(?Send)]
pub trait AfterTest<C> {
    /// Called once per executed case
    async fn after_test(&self, context: &mut C, suite: &str, test: &str, passed: bool) -> Vec<PathBuf>;
}

/// [`AfterTest`] that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArtifacts;

#[async_trait(?Send)]
impl<C> AfterTest<C> for NoArtifacts {
    async fn after_test(&self, _context: &mut C, _suite: &str, _test: &str, _passed: bool) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Counts for one suite run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteOutcome {
    /// Passed cases
    pub passed: usize,
    /// Failed cases and failed `after` hooks
    pub failed: usize,
    /// Pending or bailed cases
    pub skipped: usize,
}

impl SuiteOutcome {
    /// Check if nothing failed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn count(&mut self, entry: &TestResultEntry) {
        if entry.status.is_passed() {
            self.passed += 1;
        } else if entry.status.is_failed() {
            self.failed += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Test harness for running suites
#[derive(Debug, Clone)]
pub struct TestHarness {
    /// Timeout applied to every case and hook
    pub test_timeout: Duration,
    /// Stop after this many failures (0 = never)
    pub bail: usize,
    /// Only run cases whose "<suite> <case>" title contains this
    pub filter: Option<String>,
    /// Failures recorded by earlier groups of the same run
    pub prior_failures: usize,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self {
            test_timeout: Duration::from_millis(DEFAULT_TEST_TIMEOUT_MS),
            bail: 0,
            filter: None,
            prior_failures: 0,
        }
    }
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout and bail taken from a configuration
    #[must_use]
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new()
            .with_timeout_ms(config.test_timeout_ms)
            .with_bail(config.bail)
    }

    /// Set the per-test timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.test_timeout = Duration::from_millis(ms);
        self
    }

    /// Stop after `bail` failures
    #[must_use]
    pub const fn with_bail(mut self, bail: usize) -> Self {
        self.bail = bail;
        self
    }

    /// Count failures from earlier groups towards `bail`
    #[must_use]
    pub const fn with_prior_failures(mut self, failures: usize) -> Self {
        self.prior_failures = failures;
        self
    }

    /// Only run matching cases
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Whether a case is selected by the filter
    #[must_use]
    pub fn selects(&self, suite: &str, case: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |f| format!("{suite} {case}").contains(f))
    }

    /// Whether the bail threshold has been reached
    #[must_use]
    pub fn is_bailed(&self, reporter: &Reporter) -> bool {
        self.bail > 0 && self.prior_failures + reporter.failed_count() >= self.bail
    }

    async fn run_timed<C>(&self, body: CaseFn<C>, context: &mut C, title: &str) -> SuiteResult<()> {
        match tokio::time::timeout(self.test_timeout, body(context)).await {
            Ok(result) => result,
            Err(_) => Err(SuiteError::timeout(
                self.test_timeout.as_millis() as u64,
                format!("'{title}' did not complete"),
            )),
        }
    }

    /// Run a suite against a context, recording every result.
    ///
    /// Filtered-out cases are not recorded. When no case is selected the
    /// hooks do not run either.
    pub async fn run<C>(
        &self,
        suite: &TestSuite<C>,
        context: &mut C,
        hook: &dyn AfterTest<C>,
        reporter: &mut Reporter,
    ) -> SuiteOutcome {
        let mut outcome = SuiteOutcome::default();
        let selected: Vec<&TestCase<C>> = suite
            .tests
            .iter()
            .filter(|t| self.selects(&suite.name, &t.name))
            .collect();
        if selected.is_empty() {
            tracing::debug!(suite = %suite.name, "no cases selected");
            return outcome;
        }

        tracing::info!(suite = %suite.name, cases = selected.len(), "running suite");
        let before_error = match suite.before {
            Some(before) if !self.is_bailed(reporter) => self
                .run_timed(before, context, "before all")
                .await
                .err()
                .map(|e| e.to_string()),
            _ => None,
        };
        if let Some(error) = &before_error {
            tracing::error!(suite = %suite.name, %error, "\"before all\" hook failed");
        }

        for test in selected {
            let entry = if test.pending || self.is_bailed(reporter) {
                TestResultEntry::skipped(&suite.name, &test.name)
            } else if let Some(error) = &before_error {
                TestResultEntry::failed(
                    &suite.name,
                    &test.name,
                    Duration::ZERO,
                    format!("\"before all\" hook failed: {error}"),
                )
            } else {
                let start = Instant::now();
                let result = self.run_timed(test.run, context, &test.name).await;
                let duration = start.elapsed();
                let artifacts = hook
                    .after_test(context, &suite.name, &test.name, result.is_ok())
                    .await;
                let entry = match result {
                    Ok(()) => {
                        tracing::info!(test = %test.name, ?duration, "passed");
                        TestResultEntry::passed(&suite.name, &test.name, duration)
                    }
                    Err(error) => {
                        tracing::warn!(test = %test.name, %error, "failed");
                        TestResultEntry::failed(&suite.name, &test.name, duration, error.to_string())
                    }
                };
                entry.with_artifacts(artifacts)
            };
            outcome.count(&entry);
            reporter.record(entry);
        }

        if let Some(after) = suite.after {
            let start = Instant::now();
            if let Err(error) = self.run_timed(after, context, "after all").await {
                tracing::error!(suite = %suite.name, %error, "\"after all\" hook failed");
                let entry = TestResultEntry::failed(
                    &suite.name,
                    "\"after all\" hook",
                    start.elapsed(),
                    error.to_string(),
                );
                outcome.count(&entry);
                reporter.record(entry);
            }
        }
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::reporter::TestStatus;
    use std::cell::RefCell;

    #[derive(Debug, Default)]
    struct Log {
        events: Vec<&'static str>,
    }

    fn ok_case(log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async move {
            log.events.push("ok");
            Ok(())
        })
    }

    fn failing_case(log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async move {
            log.events.push("fail");
            Err(SuiteError::assertion("boom"))
        })
    }

    fn slow_case(_log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
    }

    fn before_hook(log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async move {
            log.events.push("before");
            Ok(())
        })
    }

    fn broken_hook(_log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async { Err(SuiteError::page("login failed")) })
    }

    fn after_hook(log: &mut Log) -> CaseFuture<'_> {
        Box::pin(async move {
            log.events.push("after");
            Ok(())
        })
    }

    #[derive(Default)]
    struct RecordingHook {
        calls: RefCell<Vec<(String, bool)>>,
    }

    #[async_trait(?Send)]
    impl AfterTest<Log> for RecordingHook {
        async fn after_test(&self, _context: &mut Log, _suite: &str, test: &str, passed: bool) -> Vec<PathBuf> {
            self.calls.borrow_mut().push((test.to_string(), passed));
            vec![PathBuf::from(format!("{test}.html"))]
        }
    }

    mod suite_tests {
        use super::*;

        #[test]
        fn test_builder_keeps_order() {
            let suite = TestSuite::new("Elements")
                .case("first", ok_case)
                .case("second", failing_case);
            let names: Vec<&str> = suite.tests().iter().map(|t| t.name.as_str()).collect();
            assert_eq!(names, ["first", "second"]);
            assert_eq!(suite.test_count(), 2);
        }

        #[test]
        fn test_filter_matches_full_title() {
            let harness = TestHarness::new().with_filter("Elements Check");
            assert!(harness.selects("Elements", "Check Box"));
            assert!(!harness.selects("Forms", "Check Box"));
            assert!(TestHarness::new().selects("any", "thing"));
        }

        #[test]
        fn test_from_config() {
            let mut config = SuiteConfig::default();
            config.bail = 2;
            config.test_timeout_ms = 1_000;
            let harness = TestHarness::from_config(&config);
            assert_eq!(harness.bail, 2);
            assert_eq!(harness.test_timeout, Duration::from_secs(1));
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_runs_cases_and_hooks_in_order() {
            let suite = TestSuite::new("S")
                .with_before(before_hook)
                .with_after(after_hook)
                .case("a", ok_case)
                .case("b", failing_case)
                .case("c", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new().run(&suite, &mut log, &NoArtifacts, &mut reporter).await;

            assert_eq!(log.events, ["before", "ok", "fail", "ok", "after"]);
            assert_eq!(outcome, SuiteOutcome { passed: 2, failed: 1, skipped: 0 });
            assert!(reporter.results()[1].error.as_deref().unwrap().contains("boom"));
        }

        #[tokio::test]
        async fn test_before_failure_fails_every_case() {
            let suite = TestSuite::new("API")
                .with_before(broken_hook)
                .with_after(after_hook)
                .case("add", ok_case)
                .case("list", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new().run(&suite, &mut log, &NoArtifacts, &mut reporter).await;

            assert_eq!(outcome.failed, 2);
            assert_eq!(log.events, ["after"]);
            for entry in reporter.results() {
                assert!(entry.error.as_deref().unwrap().contains("login failed"));
            }
        }

        #[tokio::test]
        async fn test_after_failure_is_its_own_entry() {
            let suite = TestSuite::new("API").with_after(broken_hook).case("add", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new().run(&suite, &mut log, &NoArtifacts, &mut reporter).await;

            assert_eq!(outcome, SuiteOutcome { passed: 1, failed: 1, skipped: 0 });
            assert_eq!(reporter.results()[1].name, "\"after all\" hook");
        }

        #[tokio::test]
        async fn test_timeout_fails_the_case() {
            let suite = TestSuite::new("S").case("slow", slow_case).case("fast", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new()
                .with_timeout_ms(50)
                .run(&suite, &mut log, &NoArtifacts, &mut reporter)
                .await;

            assert_eq!(outcome, SuiteOutcome { passed: 1, failed: 1, skipped: 0 });
            assert!(reporter.results()[0].error.as_deref().unwrap().contains("Timed out after 50ms"));
        }

        #[tokio::test]
        async fn test_bail_skips_the_rest() {
            let suite = TestSuite::new("S")
                .case("a", failing_case)
                .case("b", ok_case)
                .case("c", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new()
                .with_bail(1)
                .run(&suite, &mut log, &NoArtifacts, &mut reporter)
                .await;

            assert_eq!(outcome, SuiteOutcome { passed: 0, failed: 1, skipped: 2 });
            assert_eq!(log.events, ["fail"]);
            assert_eq!(reporter.results()[2].status, TestStatus::Skipped);
        }

        #[tokio::test]
        async fn test_prior_failures_count_towards_bail() {
            let suite = TestSuite::new("S").case("a", failing_case).case("b", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new()
                .with_bail(2)
                .with_prior_failures(1)
                .run(&suite, &mut log, &NoArtifacts, &mut reporter)
                .await;

            assert_eq!(outcome, SuiteOutcome { passed: 0, failed: 1, skipped: 1 });
            assert_eq!(log.events, ["fail"]);
        }

        #[tokio::test]
        async fn test_prior_failures_at_limit_skip_everything() {
            let suite = TestSuite::new("S").with_before(before_hook).case("a", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");
            let harness = TestHarness::new().with_bail(1).with_prior_failures(1);

            assert!(harness.is_bailed(&reporter));
            let outcome = harness.run(&suite, &mut log, &NoArtifacts, &mut reporter).await;

            assert_eq!(outcome, SuiteOutcome { passed: 0, failed: 0, skipped: 1 });
            assert!(log.events.is_empty());
        }

        #[tokio::test]
        async fn test_filter_skips_hooks_when_nothing_selected() {
            let suite = TestSuite::new("S").with_before(before_hook).case("a", ok_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new()
                .with_filter("zzz")
                .run(&suite, &mut log, &NoArtifacts, &mut reporter)
                .await;

            assert_eq!(outcome, SuiteOutcome::default());
            assert!(log.events.is_empty());
            assert_eq!(reporter.total_count(), 0);
        }

        #[tokio::test]
        async fn test_pending_case_is_skipped() {
            let mut suite = TestSuite::new("S").case("a", ok_case);
            suite.add_test(TestCase::pending("later"));
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");

            let outcome = TestHarness::new().run(&suite, &mut log, &NoArtifacts, &mut reporter).await;

            assert_eq!(outcome.skipped, 1);
            assert_eq!(log.events, ["ok"]);
        }

        #[tokio::test]
        async fn test_after_test_sees_outcome_and_attaches_artifacts() {
            let suite = TestSuite::new("S").case("good", ok_case).case("bad", failing_case);
            let mut log = Log::default();
            let mut reporter = Reporter::new("run");
            let hook = RecordingHook::default();

            TestHarness::new().run(&suite, &mut log, &hook, &mut reporter).await;

            assert_eq!(
                *hook.calls.borrow(),
                vec![("good".to_string(), true), ("bad".to_string(), false)]
            );
            assert_eq!(reporter.results()[1].artifacts, vec![PathBuf::from("bad.html")]);
        }
    }
}
