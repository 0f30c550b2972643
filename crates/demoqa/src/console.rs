//! Browser console capture.
//!
//! Every tab buffers what the page writes to its console (`console.*` calls
//! and browser log entries such as failed requests). After each test the
//! artifact store drains the buffer into `console.json`.

use chromiumoxide::cdp::browser_protocol::log::{LogEntry, LogEntryLevel};
use chromiumoxide::cdp::js_protocol::runtime::{ConsoleApiCalledType, RemoteObject};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Messages kept per tab before the oldest are dropped
pub const MAX_CONSOLE_MESSAGES: usize = 1_000;

/// Console message severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleSeverity {
    /// console.log, console.debug, verbose log entries
    Log,
    /// console.info
    Info,
    /// console.warn
    Warn,
    /// console.error, failed assertions
    Error,
}

impl fmt::Display for ConsoleSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => write!(f, "log"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl From<&ConsoleApiCalledType> for ConsoleSeverity {
    fn from(kind: &ConsoleApiCalledType) -> Self {
        match kind {
            ConsoleApiCalledType::Error | ConsoleApiCalledType::Assert => Self::Error,
            ConsoleApiCalledType::Warning => Self::Warn,
            ConsoleApiCalledType::Info => Self::Info,
            _ => Self::Log,
        }
    }
}

impl From<&LogEntryLevel> for ConsoleSeverity {
    fn from(level: &LogEntryLevel) -> Self {
        match level {
            LogEntryLevel::Error => Self::Error,
            LogEntryLevel::Warning => Self::Warn,
            LogEntryLevel::Info => Self::Info,
            LogEntryLevel::Verbose => Self::Log,
        }
    }
}

/// One captured console line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    /// Severity level
    pub severity: ConsoleSeverity,
    /// Where it came from (`console`, `network`, `javascript`, ...)
    pub source: String,
    /// Message text
    pub text: String,
    /// Page URL of the emitting script, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Milliseconds since the epoch
    pub timestamp: f64,
}

impl ConsoleMessage {
    /// Create a new console message
    #[must_use]
    pub fn new(severity: ConsoleSeverity, text: impl Into<String>) -> Self {
        Self {
            severity,
            source: "console".to_string(),
            text: text.into(),
            url: None,
            timestamp: 0.0,
        }
    }

    /// A `console.*` call; arguments are joined with spaces like devtools does
    #[must_use]
    pub fn from_console_call(kind: &ConsoleApiCalledType, args: &[RemoteObject], timestamp: f64) -> Self {
        let text = args.iter().map(argument_text).collect::<Vec<_>>().join(" ");
        Self {
            severity: kind.into(),
            source: "console".to_string(),
            text,
            url: None,
            timestamp,
        }
    }

    /// A browser log entry (network errors, violations, ...)
    #[must_use]
    pub fn from_log_entry(entry: &LogEntry) -> Self {
        Self {
            severity: (&entry.level).into(),
            source: entry.source.as_ref().to_string(),
            text: entry.text.clone(),
            url: entry.url.clone(),
            timestamp: *entry.timestamp.inner(),
        }
    }
}

impl fmt::Display for ConsoleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.text)?;
        if let Some(ref url) = self.url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

fn argument_text(arg: &RemoteObject) -> String {
    match arg.value {
        Some(serde_json::Value::String(ref s)) => s.clone(),
        Some(ref value) => value.to_string(),
        None => arg
            .description
            .clone()
            .or_else(|| arg.unserializable_value.as_ref().map(|v| v.inner().clone()))
            .unwrap_or_else(|| arg.r#type.as_ref().to_string()),
    }
}

/// Thread-safe console buffer shared with the tab's event listener
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    messages: Arc<Mutex<Vec<ConsoleMessage>>>,
}

impl ConsoleLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message, dropping the oldest past [`MAX_CONSOLE_MESSAGES`]
    pub fn record(&self, message: ConsoleMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            if message.severity >= ConsoleSeverity::Warn {
                tracing::debug!(severity = %message.severity, text = %message.text, "browser console");
            }
            if messages.len() >= MAX_CONSOLE_MESSAGES {
                messages.remove(0);
            }
            messages.push(message);
        }
    }

    /// Everything captured so far
    #[must_use]
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Captured errors
    #[must_use]
    pub fn errors(&self) -> Vec<ConsoleMessage> {
        self.messages()
            .into_iter()
            .filter(|m| m.severity == ConsoleSeverity::Error)
            .collect()
    }

    /// Number of captured messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// Whether nothing was captured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take everything captured so far, leaving the log empty
    #[must_use]
    pub fn drain(&self) -> Vec<ConsoleMessage> {
        self.messages
            .lock()
            .map(|mut m| std::mem::take(&mut *m))
            .unwrap_or_default()
    }

    /// Forget captured messages
    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }

    /// Pretty JSON array of the captured messages
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.messages())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chromiumoxide::cdp::browser_protocol::log::LogEntrySource;
    use chromiumoxide::cdp::js_protocol::runtime::{RemoteObjectType, Timestamp};

    fn string_arg(s: &str) -> RemoteObject {
        RemoteObject::builder()
            .r#type(RemoteObjectType::String)
            .value(serde_json::json!(s))
            .build()
            .unwrap()
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_console_call_joins_arguments() {
            let number = RemoteObject::builder()
                .r#type(RemoteObjectType::Number)
                .value(serde_json::json!(42))
                .build()
                .unwrap();
            let element = RemoteObject::builder()
                .r#type(RemoteObjectType::Object)
                .description("div#app")
                .build()
                .unwrap();
            let message = ConsoleMessage::from_console_call(
                &ConsoleApiCalledType::Warning,
                &[string_arg("rendered"), number, element],
                1_700_000_000_000.0,
            );
            assert_eq!(message.severity, ConsoleSeverity::Warn);
            assert_eq!(message.text, "rendered 42 div#app");
            assert_eq!(message.source, "console");
        }

        #[test]
        fn test_console_severity_mapping() {
            assert_eq!(ConsoleSeverity::from(&ConsoleApiCalledType::Error), ConsoleSeverity::Error);
            assert_eq!(ConsoleSeverity::from(&ConsoleApiCalledType::Assert), ConsoleSeverity::Error);
            assert_eq!(ConsoleSeverity::from(&ConsoleApiCalledType::Info), ConsoleSeverity::Info);
            assert_eq!(ConsoleSeverity::from(&ConsoleApiCalledType::Debug), ConsoleSeverity::Log);
        }

        #[test]
        fn test_log_entry() {
            let mut entry = LogEntry::new(
                LogEntrySource::Network,
                LogEntryLevel::Error,
                "Failed to load resource: 404",
                Timestamp::new(12.5),
            );
            entry.url = Some("https://demoqa.com/missing.js".to_string());
            let message = ConsoleMessage::from_log_entry(&entry);
            assert_eq!(message.severity, ConsoleSeverity::Error);
            assert_eq!(message.source, "network");
            assert_eq!(message.timestamp, 12.5);
            assert_eq!(
                message.to_string(),
                "[error] Failed to load resource: 404 (https://demoqa.com/missing.js)"
            );
        }
    }

    mod log_tests {
        use super::*;

        #[test]
        fn test_record_and_filter() {
            let log = ConsoleLog::new();
            assert!(log.is_empty());
            log.record(ConsoleMessage::new(ConsoleSeverity::Log, "hello"));
            log.record(ConsoleMessage::new(ConsoleSeverity::Error, "boom"));

            let shared = log.clone();
            assert_eq!(shared.len(), 2);
            assert_eq!(shared.errors().len(), 1);
            assert_eq!(shared.errors()[0].text, "boom");

            log.clear();
            assert!(shared.is_empty());
        }

        #[test]
        fn test_drain_empties_the_log() {
            let log = ConsoleLog::new();
            log.record(ConsoleMessage::new(ConsoleSeverity::Info, "first"));
            let drained = log.drain();
            assert_eq!(drained.len(), 1);
            assert!(log.is_empty());
            assert!(log.drain().is_empty());
        }

        #[test]
        fn test_oldest_messages_dropped() {
            let log = ConsoleLog::new();
            for i in 0..=MAX_CONSOLE_MESSAGES {
                log.record(ConsoleMessage::new(ConsoleSeverity::Log, i.to_string()));
            }
            let messages = log.messages();
            assert_eq!(messages.len(), MAX_CONSOLE_MESSAGES);
            assert_eq!(messages[0].text, "1");
        }

        #[test]
        fn test_json_shape() {
            let log = ConsoleLog::new();
            log.record(ConsoleMessage::new(ConsoleSeverity::Warn, "slow"));
            let value: serde_json::Value = serde_json::from_str(&log.to_json().unwrap()).unwrap();
            assert_eq!(value[0]["severity"], "warn");
            assert_eq!(value[0]["text"], "slow");
            assert!(value[0].get("url").is_none());
        }
    }
}
