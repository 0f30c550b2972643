//! JavaScript dialog tracking.
//!
//! The CDP page emits `Page.javascriptDialogOpening` / `...Closed` events; a
//! background listener feeds them into a [`DialogTracker`] so the session can
//! ask whether an alert is open and what it says without blocking on it.

use chromiumoxide::cdp::browser_protocol::page::{DialogType as CdpDialogType, HandleJavaScriptDialogParams};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Type of browser dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogType {
    /// Alert dialog (OK button only)
    Alert,
    /// Confirm dialog (OK/Cancel buttons)
    Confirm,
    /// Prompt dialog (text input + OK/Cancel)
    Prompt,
    /// Before unload dialog (Leave/Stay buttons)
    BeforeUnload,
}

impl std::fmt::Display for DialogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alert => write!(f, "alert"),
            Self::Confirm => write!(f, "confirm"),
            Self::Prompt => write!(f, "prompt"),
            Self::BeforeUnload => write!(f, "beforeunload"),
        }
    }
}

impl From<CdpDialogType> for DialogType {
    fn from(t: CdpDialogType) -> Self {
        match t {
            CdpDialogType::Alert => Self::Alert,
            CdpDialogType::Confirm => Self::Confirm,
            CdpDialogType::Prompt => Self::Prompt,
            CdpDialogType::Beforeunload => Self::BeforeUnload,
        }
    }
}

/// How a dialog was (or is to be) resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    /// Accepted (OK/Yes/Leave)
    Accept,
    /// Accepted with prompt text
    AcceptWith(String),
    /// Dismissed (Cancel/No/Stay)
    Dismiss,
    /// Still open
    Pending,
}

impl DialogAction {
    /// CDP command resolving an open dialog this way
    #[must_use]
    pub fn to_params(&self) -> Option<HandleJavaScriptDialogParams> {
        match self {
            Self::Accept => Some(HandleJavaScriptDialogParams::new(true)),
            Self::AcceptWith(text) => {
                let mut params = HandleJavaScriptDialogParams::new(true);
                params.prompt_text = Some(text.clone());
                Some(params)
            }
            Self::Dismiss => Some(HandleJavaScriptDialogParams::new(false)),
            Self::Pending => None,
        }
    }
}

/// A browser dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialog {
    dialog_type: DialogType,
    message: String,
    default_value: Option<String>,
    action: DialogAction,
}

impl Dialog {
    /// Create a new, pending dialog
    #[must_use]
    pub fn new(dialog_type: DialogType, message: impl Into<String>) -> Self {
        Self {
            dialog_type,
            message: message.into(),
            default_value: None,
            action: DialogAction::Pending,
        }
    }

    /// Create an alert
    #[must_use]
    pub fn alert(message: impl Into<String>) -> Self {
        Self::new(DialogType::Alert, message)
    }

    /// Create a confirm
    #[must_use]
    pub fn confirm(message: impl Into<String>) -> Self {
        Self::new(DialogType::Confirm, message)
    }

    /// Create a prompt
    #[must_use]
    pub fn prompt(message: impl Into<String>, default: Option<String>) -> Self {
        let mut dialog = Self::new(DialogType::Prompt, message);
        dialog.default_value = default;
        dialog
    }

    /// Set the default prompt value
    #[must_use]
    pub fn with_default_value(mut self, default: Option<String>) -> Self {
        self.default_value = default;
        self
    }

    /// Dialog type
    #[must_use]
    pub const fn dialog_type(&self) -> DialogType {
        self.dialog_type
    }

    /// Displayed message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Default prompt value
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// How the dialog was resolved
    #[must_use]
    pub const fn action(&self) -> &DialogAction {
        &self.action
    }

    /// Whether the dialog was resolved
    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.action != DialogAction::Pending
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    current: Option<Dialog>,
    history: Vec<Dialog>,
}

/// Thread-safe record of the open dialog and past dialogs of one page
#[derive(Debug, Clone, Default)]
pub struct DialogTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl DialogTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dialog opening
    pub fn opened(&self, dialog: Dialog) {
        if let Ok(mut state) = self.state.lock() {
            tracing::debug!(kind = %dialog.dialog_type(), message = dialog.message(), "dialog opened");
            state.current = Some(dialog);
        }
    }

    /// Record the open dialog closing
    pub fn closed(&self, accepted: bool, user_input: Option<String>) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(mut dialog) = state.current.take() {
                dialog.action = match (accepted, user_input) {
                    (false, _) => DialogAction::Dismiss,
                    (true, Some(text)) if !text.is_empty() => DialogAction::AcceptWith(text),
                    (true, _) => DialogAction::Accept,
                };
                state.history.push(dialog);
            }
        }
    }

    /// The dialog currently open, if any
    #[must_use]
    pub fn current(&self) -> Option<Dialog> {
        self.state.lock().ok().and_then(|s| s.current.clone())
    }

    /// Whether a dialog is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().map(|s| s.current.is_some()).unwrap_or(false)
    }

    /// Closed dialogs, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<Dialog> {
        self.state.lock().map(|s| s.history.clone()).unwrap_or_default()
    }

    /// Forget everything (after navigation or window switch)
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.current = None;
            state.history.clear();
        }
    }
}
