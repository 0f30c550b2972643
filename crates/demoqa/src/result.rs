//! Result and error types for the suite.

use thiserror::Error;

/// Result type for suite operations
pub type SuiteResult<T> = Result<T, SuiteError>;

/// Errors that can occur while driving the browser or the API
#[derive(Debug, Error)]
pub enum SuiteError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// CDP command or page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector description
        selector: String,
    },

    /// Bounded polling expired
    #[error("Timed out after {ms}ms: {message}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Descriptive timeout message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// JavaScript dialog error
    #[error("Dialog error: {message}")]
    Dialog {
        /// Error message
        message: String,
    },

    /// Window handling error
    #[error("Window error: {message}")]
    Window {
        /// Error message
        message: String,
    },

    /// Fixture error (missing upload file, download directory)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API contract error
    #[error("API error: {message}")]
    Api {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl SuiteError {
    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(ms: u64, message: impl Into<String>) -> Self {
        Self::Timeout {
            ms,
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an API error
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Prefix an assertion failure with what was being checked; other
    /// errors pass through unchanged
    #[must_use]
    pub fn context(self, what: impl std::fmt::Display) -> Self {
        match self {
            Self::AssertionFailed { message } => Self::AssertionFailed {
                message: format!("{what}: {message}"),
            },
            other => other,
        }
    }

    /// Whether this error came from a bounded wait expiring
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<chromiumoxide::error::CdpError> for SuiteError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::page(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_is_descriptive() {
        let err = SuiteError::timeout(10_000, "Expected file sampleFile.jpeg to be downloaded");
        assert!(err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Timed out after 10000ms: Expected file sampleFile.jpeg to be downloaded"
        );
    }

    #[test]
    fn test_assertion_error() {
        let err = SuiteError::assertion("expected 'a', got 'b'");
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("Assertion failed"));
    }

    #[test]
    fn test_context_only_touches_assertions() {
        let err = SuiteError::assertion("expected 2, got 3").context("multi colours");
        assert_eq!(err.to_string(), "Assertion failed: multi colours: expected 2, got 3");

        let timeout = SuiteError::timeout(5, "late").context("ignored");
        assert_eq!(timeout.to_string(), "Timed out after 5ms: late");
    }

    #[test]
    fn test_element_not_found() {
        let err = SuiteError::ElementNotFound {
            selector: "#userName".to_string(),
        };
        assert!(err.to_string().contains("#userName"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SuiteError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
