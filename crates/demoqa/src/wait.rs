//! Bounded polling.
//!
//! Everything flaky in the application under test (alerts that open late,
//! progress bars, downloads landing on disk) is synchronised through
//! [`wait_until`]: poll an async predicate until it holds or the timeout
//! expires.

use crate::result::{SuiteError, SuiteResult};
use std::future::Future;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Message carried by the timeout error
    pub message: Option<String>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            message: None,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the timeout message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a duration (never zero)
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the predicate ran
    pub polls: u32,
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `condition` until it returns `Ok(true)` or the timeout expires.
///
/// The predicate runs at least once. An `Err` from the predicate counts as
/// "not yet"; the last one is attached to the timeout error.
pub async fn wait_until<F, Fut>(options: &WaitOptions, mut condition: F) -> SuiteResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SuiteResult<bool>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut polls = 0u32;
    let mut last_error: Option<SuiteError> = None;

    loop {
        polls += 1;
        match condition().await {
            Ok(true) => {
                return Ok(WaitResult {
                    elapsed: start.elapsed(),
                    polls,
                })
            }
            Ok(false) => {}
            Err(e) => last_error = Some(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            break;
        }
        tokio::time::sleep(options.poll_interval().min(timeout - elapsed)).await;
    }

    let mut message = options
        .message
        .clone()
        .unwrap_or_else(|| "condition was not met".to_string());
    if let Some(e) = last_error {
        message.push_str(&format!(" (last error: {e})"));
    }
    tracing::debug!(timeout_ms = options.timeout_ms, polls, "wait timed out");
    Err(SuiteError::timeout(options.timeout_ms, message))
}

/// Sleep for a fixed duration (discouraged - prefer [`wait_until`])
pub async fn pause(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let o = WaitOptions::default();
            assert_eq!(o.timeout_ms, 10_000);
            assert_eq!(o.poll_interval_ms, 100);
            assert!(o.message.is_none());
        }

        #[test]
        fn test_builder() {
            let o = WaitOptions::new()
                .with_timeout(2000)
                .with_poll_interval(0)
                .with_message("alert did not open");
            assert_eq!(o.timeout(), Duration::from_millis(2000));
            assert_eq!(o.poll_interval(), Duration::from_millis(1));
            assert_eq!(o.message.as_deref(), Some("alert did not open"));
        }
    }

    mod polling_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let result = wait_until(&WaitOptions::new(), || async { Ok(true) })
                .await
                .unwrap();
            assert_eq!(result.polls, 1);
        }

        #[tokio::test]
        async fn test_succeeds_after_some_polls() {
            let counter = Arc::new(AtomicU32::new(0));
            let options = WaitOptions::new().with_timeout(2000).with_poll_interval(5);
            let c = Arc::clone(&counter);
            let result = wait_until(&options, move || {
                let c = Arc::clone(&c);
                async move { Ok(c.fetch_add(1, Ordering::SeqCst) >= 3) }
            })
            .await
            .unwrap();
            assert_eq!(result.polls, 4);
        }

        #[tokio::test]
        async fn test_timeout_carries_message() {
            let options = WaitOptions::new()
                .with_timeout(30)
                .with_poll_interval(5)
                .with_message("Expected file sampleFile.jpeg to be downloaded");
            let err = wait_until(&options, || async { Ok(false) })
                .await
                .unwrap_err();
            assert!(err.is_timeout());
            assert!(err
                .to_string()
                .contains("Expected file sampleFile.jpeg to be downloaded"));
        }

        #[tokio::test]
        async fn test_predicate_error_is_not_fatal() {
            let counter = Arc::new(AtomicU32::new(0));
            let options = WaitOptions::new().with_timeout(2000).with_poll_interval(5);
            let c = Arc::clone(&counter);
            let result = wait_until(&options, move || {
                let c = Arc::clone(&c);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(SuiteError::page("element detached"))
                    } else {
                        Ok(true)
                    }
                }
            })
            .await;
            assert!(result.is_ok());
        }

        #[tokio::test]
        async fn test_last_error_attached_to_timeout() {
            let options = WaitOptions::new().with_timeout(20).with_poll_interval(5);
            let err = wait_until(&options, || async {
                Err::<bool, _>(SuiteError::page("no such element"))
            })
            .await
            .unwrap_err();
            assert!(err.to_string().contains("last error"));
            assert!(err.to_string().contains("no such element"));
        }

        #[tokio::test]
        async fn test_zero_timeout_polls_once() {
            let options = WaitOptions::new().with_timeout(0);
            let counter = Arc::new(AtomicU32::new(0));
            let c = Arc::clone(&counter);
            let _ = wait_until(&options, move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(false)
                }
            })
            .await;
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }
}
