//! Suite runner: resolves configuration, drives the harness, writes reports

use crate::commands::{ConfigArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use demoqa::suites::{self, Selection};
use demoqa::{
    ArtifactStore, BookStoreClient, NoArtifacts, Profile, Reporter, Session, SessionPool, SuiteConfig, TestHarness,
    TestResultEntry, TestSuite,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

/// Suite name under which a failed browser launch is reported
pub const SESSION_SUITE: &str = "Browser session";

/// Totals across every group that ran
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Passed tests
    pub passed: usize,
    /// Failed tests, hook failures included
    pub failed: usize,
    /// Skipped tests
    pub skipped: usize,
    /// JUnit files written
    pub reports: Vec<PathBuf>,
}

impl RunSummary {
    /// Check if nothing failed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn add(&mut self, reporter: &Reporter, report: PathBuf) {
        self.passed += reporter.passed_count();
        self.failed += reporter.failed_count();
        self.skipped += reporter.skipped_count();
        self.reports.push(report);
    }
}

/// Parse a `--suite` value, rejecting names that match no suite
pub fn parse_selection(value: &str) -> CliResult<Selection> {
    let selection: Selection = value
        .parse()
        .map_err(|_| CliError::invalid_argument("empty --suite value"))?;
    if selection.desktop_suites().is_empty() && selection.api_suites().is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no suite matches '{}'; known suites: {}",
            value.trim(),
            suite_names().join(", ")
        )));
    }
    Ok(selection)
}

/// Layer the run flags over a loaded configuration
pub fn apply_overrides(config: &mut SuiteConfig, args: &RunArgs) -> CliResult<()> {
    if args.headed {
        config.browser.headless = false;
    }
    if let Some(url) = &args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(bail) = args.bail {
        config.bail = bail;
    }
    if let Some(ms) = args.timeout {
        config.test_timeout_ms = ms;
    }
    if let Some(dir) = &args.junit_dir {
        config.junit_dir.clone_from(dir);
    }
    if let Some(dir) = &args.artifacts_dir {
        config.artifacts_dir.clone_from(dir);
    }
    config.validate()?;
    Ok(())
}

/// Effective configuration for one profile of a run
pub fn resolve_config(args: &RunArgs, profile: Profile) -> CliResult<SuiteConfig> {
    let mut config = SuiteConfig::load(args.config.as_deref(), profile)?;
    apply_overrides(&mut config, args)?;
    Ok(config)
}

/// YAML for `demoqa-run config`
pub fn render_config(args: &ConfigArgs) -> CliResult<String> {
    let config = SuiteConfig::load(args.config.as_deref(), args.profile.into())?;
    Ok(config.to_yaml()?)
}

/// Suite and case listing for `demoqa-run list`
pub fn render_list(selection: &Selection) -> String {
    let mut out = String::new();
    let desktop = selection.desktop_suites();
    let api = selection.api_suites();
    let groups = desktop
        .iter()
        .map(|s| (Profile::Desktop, s.name.as_str(), case_names(s)))
        .chain(api.iter().map(|s| (Profile::Api, s.name.as_str(), case_names(s))));

    for (profile, name, cases) in groups {
        let _ = writeln!(out, "{name} [{profile}]");
        for case in cases {
            let _ = writeln!(out, "  - {case}");
        }
    }
    out
}

fn case_names<C>(suite: &TestSuite<C>) -> Vec<String> {
    suite.tests().iter().map(|t| t.name.clone()).collect()
}

fn selected_count<C>(harness: &TestHarness, suites: &[TestSuite<C>]) -> usize {
    suites
        .iter()
        .flat_map(|s| s.tests().iter().map(move |t| (s.name.as_str(), t.name.as_str())))
        .filter(|(suite, case)| harness.selects(suite, case))
        .count()
}

fn build_harness(config: &SuiteConfig, args: &RunArgs) -> TestHarness {
    let harness = TestHarness::from_config(config);
    match &args.filter {
        Some(filter) => harness.with_filter(filter.clone()),
        None => harness,
    }
}

/// Runs the selected suites
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    progress: ProgressReporter,
}

impl TestRunner {
    /// Create a new test runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let progress = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
        Self { config, progress }
    }

    /// Run every suite `args` selects; desktop suites first, then API
    pub async fn run(&mut self, args: &RunArgs) -> CliResult<RunSummary> {
        let selection = parse_selection(&args.suite)?;
        let desktop = selection.desktop_suites();
        let api = selection.api_suites();

        let desktop_config = if desktop.is_empty() {
            None
        } else {
            Some(resolve_config(args, Profile::Desktop)?)
        };
        let api_config = if api.is_empty() {
            None
        } else {
            Some(resolve_config(args, Profile::Api)?)
        };

        let desktop_harness = desktop_config.as_ref().map(|c| build_harness(c, args));
        let api_harness = api_config.as_ref().map(|c| build_harness(c, args));
        let total = desktop_harness
            .as_ref()
            .map_or(0, |h| selected_count(h, &desktop))
            + api_harness.as_ref().map_or(0, |h| selected_count(h, &api));

        if total == 0 {
            self.progress.warning("No tests selected");
            return Ok(RunSummary::default());
        }

        if self.config.verbosity.is_verbose() {
            self.progress.info(&format!("{total} tests selected"));
        }
        self.progress.start_progress(total as u64, "Starting...");

        let mut summary = RunSummary::default();
        let mut bailed = false;

        if let (Some(config), Some(harness)) = (desktop_config, desktop_harness) {
            let reporter = self.run_desktop(&desktop, config.clone(), &harness).await;
            self.progress.finish();
            let reporter = reporter?;
            bailed = harness.is_bailed(&reporter);
            let report = reporter.write_junit(&config.junit_dir, Profile::Desktop.as_str())?;
            self.progress.summary(&reporter);
            self.progress.report_written(&report);
            summary.add(&reporter, report);
        }

        if let (Some(config), Some(harness)) = (api_config, api_harness) {
            if bailed {
                self.progress
                    .warning("Skipping API suites: failure limit reached");
            } else {
                let harness = harness.with_prior_failures(summary.failed);
                let reporter = self.run_api(&api, &config, &harness).await;
                self.progress.finish();
                let reporter = reporter?;
                let report = reporter.write_junit(&config.junit_dir, Profile::Api.as_str())?;
                self.progress.summary(&reporter);
                self.progress.report_written(&report);
                summary.add(&reporter, report);
            }
        }

        Ok(summary)
    }

    async fn run_desktop(
        &self,
        suites: &[TestSuite<Session>],
        config: SuiteConfig,
        harness: &TestHarness,
    ) -> CliResult<Reporter> {
        let store = ArtifactStore::from_config(&config);
        let mut reporter = Reporter::new(Profile::Desktop.as_str()).with_listener(self.progress.listener());

        tracing::info!(base_url = %config.base_url, headless = config.browser.headless, "launching browser");
        let pool = SessionPool::new(config);
        let start = Instant::now();
        let mut session = match pool.start().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "browser session did not start");
                reporter.record(session_failure(&e, start));
                return Ok(reporter);
            }
        };

        for suite in suites {
            if harness.is_bailed(&reporter) {
                break;
            }
            self.progress.set_message(&suite.name);
            tracing::info!(suite = %suite.name, "running suite");
            harness.run(suite, &mut session, &store, &mut reporter).await;
        }

        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        Ok(reporter)
    }

    async fn run_api(
        &self,
        suites: &[TestSuite<BookStoreClient>],
        config: &SuiteConfig,
        harness: &TestHarness,
    ) -> CliResult<Reporter> {
        let mut reporter = Reporter::new(Profile::Api.as_str()).with_listener(self.progress.listener());
        let mut client = BookStoreClient::new(config.base_url.trim_end_matches('/'))?;

        for suite in suites {
            if harness.is_bailed(&reporter) {
                break;
            }
            self.progress.set_message(&suite.name);
            tracing::info!(suite = %suite.name, base_url = %client.base_url(), "running suite");
            harness.run(suite, &mut client, &NoArtifacts, &mut reporter).await;
        }
        Ok(reporter)
    }
}

/// Failed entry standing in for a group whose browser never started
fn session_failure(error: &demoqa::SuiteError, start: Instant) -> TestResultEntry {
    TestResultEntry::failed(
        SESSION_SUITE,
        "start browser session",
        start.elapsed(),
        error.to_string(),
    )
}

/// Names of every suite, for error messages and help text
#[must_use]
pub fn suite_names() -> Vec<String> {
    suites::desktop()
        .iter()
        .map(|s| s.name.clone())
        .chain(suites::api().iter().map(|s| s.name.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run_args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run"];
        argv.extend_from_slice(extra);
        RunArgs::parse_from(argv)
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_keywords() {
            assert_eq!(parse_selection("desktop").unwrap(), Selection::Desktop);
            assert_eq!(parse_selection("API").unwrap(), Selection::Api);
            assert_eq!(parse_selection("all").unwrap(), Selection::All);
        }

        #[test]
        fn test_name_fragment() {
            let selection = parse_selection("widgets").unwrap();
            assert_eq!(selection.desktop_suites().len(), 1);
            assert!(selection.api_suites().is_empty());
        }

        #[test]
        fn test_unknown_name_is_rejected() {
            let err = parse_selection("no-such-suite").unwrap_err();
            assert!(err.to_string().contains("no suite matches 'no-such-suite'"));
        }

        #[test]
        fn test_empty_is_rejected() {
            assert!(parse_selection("  ").is_err());
        }
    }

    mod override_tests {
        use super::*;

        #[test]
        fn test_flags_override_config() {
            let mut config = SuiteConfig::for_profile(Profile::Desktop);
            let args = run_args(&[
                "--headed",
                "--base-url",
                "http://localhost:3000/",
                "--bail",
                "1",
                "--timeout",
                "5000",
                "--junit-dir",
                "out/junit",
                "--artifacts-dir",
                "out/artifacts",
            ]);
            apply_overrides(&mut config, &args).unwrap();

            assert!(!config.browser.headless);
            assert_eq!(config.base_url, "http://localhost:3000/");
            assert_eq!(config.bail, 1);
            assert_eq!(config.test_timeout_ms, 5000);
            assert_eq!(config.junit_dir, PathBuf::from("out/junit"));
            assert_eq!(config.artifacts_dir, PathBuf::from("out/artifacts"));
        }

        #[test]
        fn test_no_flags_keeps_config() {
            let mut config = SuiteConfig::for_profile(Profile::Api);
            let before = config.clone();
            apply_overrides(&mut config, &run_args(&[])).unwrap();
            assert_eq!(config, before);
        }

        #[test]
        fn test_bad_base_url_is_rejected() {
            let mut config = SuiteConfig::default();
            let args = run_args(&["--base-url", "demoqa.com"]);
            assert!(apply_overrides(&mut config, &args).is_err());
        }

        #[test]
        fn test_filter_reaches_harness() {
            let config = SuiteConfig::default();
            let harness = build_harness(&config, &run_args(&["--filter", "Slider"]));
            assert!(harness.selects("DemoQA Widgets Section", "Slider - should move"));
            assert!(!harness.selects("DemoQA Widgets Section", "Accordion"));
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_list_all() {
            let text = render_list(&Selection::All);
            assert!(text.contains("DemoQA Elements Section [desktop]"));
            assert!(text.contains("BookStore and User API Flow [api]"));
            assert!(text.contains("  - should add a new book successfully"));
        }

        #[test]
        fn test_list_api_only() {
            let text = render_list(&Selection::Api);
            assert!(!text.contains("[desktop]"));
            assert_eq!(text.lines().count(), 4);
        }

        #[test]
        fn test_selected_count_respects_filter() {
            let config = SuiteConfig::default();
            let all = build_harness(&config, &run_args(&[]));
            let filtered = build_harness(&config, &run_args(&["--filter", "BookStore"]));
            let api = suites::api();
            assert_eq!(selected_count(&all, &api), 3);
            assert_eq!(selected_count(&filtered, &api), 3);
            assert_eq!(selected_count(&filtered, &suites::desktop()), 0);
        }

        #[test]
        fn test_suite_names() {
            let names = suite_names();
            assert_eq!(names.len(), 6);
            assert_eq!(names.last().map(String::as_str), Some("BookStore and User API Flow"));
        }
    }

    mod summary_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_summary_accumulates() {
            let mut reporter = Reporter::new("api");
            reporter.record(TestResultEntry::passed("s", "a", Duration::ZERO));
            reporter.record(TestResultEntry::failed("s", "b", Duration::ZERO, "boom"));
            reporter.record(TestResultEntry::skipped("s", "c"));

            let mut summary = RunSummary::default();
            summary.add(&reporter, PathBuf::from("junit-report/api.xml"));
            assert_eq!((summary.passed, summary.failed, summary.skipped), (1, 1, 1));
            assert!(!summary.all_passed());
            assert_eq!(summary.reports.len(), 1);
        }

        #[test]
        fn test_session_failure_is_reported_as_failed_case() {
            let error = demoqa::SuiteError::BrowserLaunch {
                message: "could not find chromium".to_string(),
            };
            let mut reporter = Reporter::new(Profile::Desktop.as_str());
            reporter.record(session_failure(&error, Instant::now()));

            assert_eq!(reporter.failed_count(), 1);
            let entry = &reporter.results()[0];
            assert_eq!(entry.suite, SESSION_SUITE);
            assert!(entry.error.as_deref().unwrap().contains("could not find chromium"));

            let dir = tempfile::tempdir().unwrap();
            let path = reporter.write_junit(dir.path(), "desktop").unwrap();
            let xml = std::fs::read_to_string(path).unwrap();
            assert!(xml.contains(r#"<testsuite name="Browser session""#));
            assert!(xml.contains("could not find chromium"));
        }

        #[test]
        fn test_desktop_failures_count_towards_api_bail() {
            let args = run_args(&["--suite", "all", "--bail", "2"]);
            let mut config = SuiteConfig::for_profile(Profile::Api);
            apply_overrides(&mut config, &args).unwrap();
            let mut desktop = Reporter::new("desktop");
            desktop.record(TestResultEntry::failed("Elements", "Text Box", Duration::ZERO, "boom"));

            let mut summary = RunSummary::default();
            summary.add(&desktop, PathBuf::from("junit-report/desktop.xml"));
            let harness = build_harness(&config, &args).with_prior_failures(summary.failed);

            let mut api = Reporter::new("api");
            assert!(!harness.is_bailed(&api));
            api.record(TestResultEntry::failed("BookStore", "create user", Duration::ZERO, "500"));
            assert!(harness.is_bailed(&api));
        }
    }
}
