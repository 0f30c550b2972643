//! Output formatting and progress reporting

use console::{style, Style, Term};
use demoqa::{Reporter, TestResultEntry, TestStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Progress reporter for suite runs
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` tests
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Result callback for a [`Reporter`]: advances the bar and prints one
    /// line per test. Failures print even in quiet mode.
    #[must_use]
    pub fn listener(&self) -> impl FnMut(&TestResultEntry) + 'static {
        let bar = self.progress_bar.clone();
        let term = self.term.clone();
        let use_color = self.use_color;
        let quiet = self.quiet;

        move |entry| {
            let show = entry.status.is_failed() || !quiet;
            let line = format_result(entry, use_color);
            match &bar {
                Some(pb) => {
                    pb.inc(1);
                    if show {
                        pb.println(line);
                    }
                }
                None if show => {
                    let _ = term.write_line(&line);
                }
                None => {}
            }
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&styled);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Note where a JUnit report was written
    pub fn report_written(&self, path: &Path) {
        self.info(&format!("JUnit report: {}", path.display()));
    }

    /// Print the totals for one reporter, then each failure again
    pub fn summary(&self, reporter: &Reporter) {
        let failed = reporter.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        let line = reporter.summary();
        if self.use_color {
            let styled = if failed > 0 {
                Style::new().red().bold().apply_to(line)
            } else {
                Style::new().green().bold().apply_to(line)
            };
            let _ = self.term.write_line(&styled.to_string());
        } else {
            let _ = self.term.write_line(&line);
        }

        for (index, failure) in reporter.failures().into_iter().enumerate() {
            let _ = self.term.write_line(&format!(
                "  {}) {} {}",
                index + 1,
                failure.suite,
                failure.name
            ));
            if let Some(error) = &failure.error {
                let _ = self.term.write_line(&format!("     {error}"));
            }
        }
    }
}

/// One line per recorded result, with error and artifacts indented below
#[must_use]
pub fn format_result(entry: &TestResultEntry, use_color: bool) -> String {
    let prefix = match (entry.status, use_color) {
        (TestStatus::Passed, true) => style("✓").green().bold().to_string(),
        (TestStatus::Failed, true) => style("✗").red().bold().to_string(),
        (TestStatus::Skipped, true) => style("-").yellow().to_string(),
        (TestStatus::Passed, false) => "PASS".to_string(),
        (TestStatus::Failed, false) => "FAIL".to_string(),
        (TestStatus::Skipped, false) => "SKIP".to_string(),
    };

    let mut line = format!("{prefix} {} › {}", entry.suite, entry.name);
    if entry.status != TestStatus::Skipped {
        line.push_str(&format!(" ({:.2}s)", entry.duration.as_secs_f64()));
    }
    if let Some(error) = &entry.error {
        line.push_str(&format!("\n    {error}"));
    }
    for artifact in &entry.artifacts {
        line.push_str(&format!("\n    saved {}", artifact.display()));
    }
    line
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    mod format_tests {
        use super::*;

        #[test]
        fn test_passed_line() {
            let entry = TestResultEntry::passed("Elements", "text box", Duration::from_millis(1500));
            assert_eq!(format_result(&entry, false), "PASS Elements › text box (1.50s)");
        }

        #[test]
        fn test_skipped_line_has_no_duration() {
            let entry = TestResultEntry::skipped("Elements", "pending");
            assert_eq!(format_result(&entry, false), "SKIP Elements › pending");
        }

        #[test]
        fn test_failed_line_lists_error_and_artifacts() {
            let entry = TestResultEntry::failed("Forms", "submit", Duration::ZERO, "Assertion failed: nope")
                .with_artifacts(vec![PathBuf::from("artifacts/forms/submit/screenshot.png")]);
            let line = format_result(&entry, false);
            let lines: Vec<&str> = line.lines().collect();
            assert_eq!(lines[0], "FAIL Forms › submit (0.00s)");
            assert_eq!(lines[1], "    Assertion failed: nope");
            assert!(lines[2].ends_with("screenshot.png"));
        }

        #[test]
        fn test_colored_prefix() {
            let entry = TestResultEntry::passed("s", "t", Duration::ZERO);
            assert!(format_result(&entry, true).contains('✓'));
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_new_reporter() {
            let reporter = ProgressReporter::new(true, false);
            assert!(reporter.use_color);
            assert!(!reporter.quiet);
        }

        #[test]
        fn test_quiet_reporter_has_no_bar() {
            let mut reporter = ProgressReporter::new(false, true);
            reporter.start_progress(5, "Running");
            assert!(reporter.progress_bar.is_none());
        }

        #[test]
        fn test_listener_advances_bar() {
            let mut progress = ProgressReporter::new(false, false);
            progress.start_progress(2, "Running");
            let mut reporter = Reporter::new("desktop").with_listener(progress.listener());
            reporter.record(TestResultEntry::passed("s", "a", Duration::ZERO));
            reporter.record(TestResultEntry::skipped("s", "b"));
            assert_eq!(progress.progress_bar.as_ref().unwrap().position(), 2);
            progress.finish();
        }

        #[test]
        fn test_summary_does_not_panic() {
            let progress = ProgressReporter::new(false, false);
            let mut reporter = Reporter::new("api");
            reporter.record(TestResultEntry::failed("s", "a", Duration::ZERO, "boom"));
            progress.summary(&reporter);
        }
    }
}
