//! Alerts, Frame & Windows section.
//!
//! Dialog handlers follow one rule: a dialog that never shows up, or that
//! closes before it can be answered, is logged and tolerated; a dialog whose
//! text differs from the expectation fails the test.

use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::wait::{self, WaitOptions};
use serde::{Deserialize, Serialize};

/// How long a new tab or window may take to appear
pub const NEW_WINDOW_TIMEOUT_MS: u64 = 3_000;
/// How long an alert may take to open
pub const ALERT_TIMEOUT_MS: u64 = 3_000;
/// How long the timer alert may take to open
pub const DELAYED_ALERT_TIMEOUT_MS: u64 = 7_000;
/// How long the alert result line may take to update
pub const ALERT_RESULT_TIMEOUT_MS: u64 = 2_000;

const FRAME_TIMEOUT_MS: u64 = 3_000;
const MODAL_TIMEOUT_MS: u64 = 3_000;

const NEW_TAB: &str = "#tabButton";
const NEW_WINDOW: &str = "#windowButton";
const NEW_WINDOW_MESSAGE: &str = "#messageWindowButton";
const ALERT_BUTTON: &str = "#alertButton";
const CONFIRM_BUTTON: &str = "#confirmButton";
const PROMPT_BUTTON: &str = "#promtButton";
const TIMER_ALERT_BUTTON: &str = "#timerAlertButton";
const CONFIRM_RESULT: &str = "#confirmResult";
const PROMPT_RESULT: &str = "#promptResult";
const FRAME_HEADING: &str = "#sampleHeading";
const MODAL_TITLE: &str = ".modal-title";
const MODAL_BODY: &str = ".modal-body";

/// First iframe of the Frames page
pub const FRAME_1: &str = "#frame1";
/// Second iframe of the Frames page
pub const FRAME_2: &str = "#frame2";

/// Which modal to open on the Modal Dialogs page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalSize {
    Small,
    Large,
}

impl ModalSize {
    const fn open_button(self) -> &'static str {
        match self {
            Self::Small => "#showSmallModal",
            Self::Large => "#showLargeModal",
        }
    }

    const fn close_button(self) -> &'static str {
        match self {
            Self::Small => "#closeSmallModal",
            Self::Large => "#closeLargeModal",
        }
    }
}

/// Title and body text of a modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalContent {
    pub title: String,
    pub body: String,
}

/// Body texts of the nested frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedFrameTexts {
    pub parent_text: String,
    pub child_text: String,
}

/// The Alerts, Frame & Windows section
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertsFrameWindowsPage;

impl PageObject for AlertsFrameWindowsPage {
    fn path(&self) -> &str {
        "/alertsWindows"
    }

    fn page_name(&self) -> &str {
        "alerts-frame-windows"
    }
}

impl AlertsFrameWindowsPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========================================================================
    // Browser windows
    // ========================================================================

    /// Open a tab, check its heading, close it and come back
    pub async fn open_new_tab_and_validate(&self, session: &mut Session, expected: &str) -> SuiteResult<()> {
        self.open_and_validate(session, NEW_TAB, "New tab did not open", Some(expected))
            .await
    }

    /// Open a window, check its heading, close it and come back
    pub async fn open_new_window_and_validate(
        &self,
        session: &mut Session,
        expected: &str,
    ) -> SuiteResult<()> {
        self.open_and_validate(session, NEW_WINDOW, "New window did not open", Some(expected))
            .await
    }

    /// Open the message window, close it and come back
    pub async fn open_new_window_message_and_validate(&self, session: &mut Session) -> SuiteResult<()> {
        self.open_and_validate(session, NEW_WINDOW_MESSAGE, "Message window did not open", None)
            .await
    }

    async fn open_and_validate(
        &self,
        session: &mut Session,
        button: &str,
        timeout_message: &str,
        expected_heading: Option<&str>,
    ) -> SuiteResult<()> {
        let original = session.window_handle();
        let before = session.window_handles().await?;
        session.click(button).await?;
        let opened = session
            .wait_for_new_window(&before, NEW_WINDOW_TIMEOUT_MS, timeout_message)
            .await?;
        session.switch_to_window(&opened).await?;

        let heading = match expected_heading {
            Some(_) => Some(session.get_text("h1").await),
            None => None,
        };

        session.close_window().await?;
        session.switch_to_window(&original).await?;

        if let (Some(expected), Some(actual)) = (expected_heading, heading) {
            crate::assertion::equals(&actual?.as_str(), &expected)?;
        }
        Ok(())
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Click the alert button, check the text and accept
    pub async fn handle_simple_alert(&self, session: &Session, expected: Option<&str>) -> SuiteResult<()> {
        session.click_detached(ALERT_BUTTON).await?;
        self.answer_alert(session, ALERT_TIMEOUT_MS, "Alert", expected, true)
            .await
    }

    /// Click the confirm button, check the text, then accept or dismiss
    pub async fn handle_confirm_alert(
        &self,
        session: &Session,
        accept: bool,
        expected: Option<&str>,
    ) -> SuiteResult<()> {
        session.scroll_into_view(CONFIRM_BUTTON).await?;
        session.click_detached(CONFIRM_BUTTON).await?;
        self.answer_alert(session, ALERT_TIMEOUT_MS, "Confirm alert", expected, accept)
            .await
    }

    /// Answer the prompt with `answer`
    pub async fn handle_prompt_alert(&self, session: &Session, answer: &str) -> SuiteResult<()> {
        session.scroll_into_view(PROMPT_BUTTON).await?;
        session.click_detached(PROMPT_BUTTON).await?;
        if session
            .wait_for_alert(ALERT_TIMEOUT_MS, "Prompt did not appear")
            .await
            .is_err()
        {
            tracing::warn!("Prompt never appeared.");
            return Ok(());
        }
        if let Err(e) = session.send_alert_text(answer).await {
            tracing::warn!(error = %e, "Prompt disappeared before it was answered.");
        }
        Ok(())
    }

    /// Wait for the confirm result line to read `expected`
    pub async fn wait_for_alert_result(&self, session: &Session, expected: &str, timeout_ms: u64) -> SuiteResult<()> {
        wait_for_text(session, CONFIRM_RESULT, expected, timeout_ms, "Alert result did not match").await
    }

    /// Wait for the prompt result line to read `expected`
    pub async fn wait_for_prompt_result(&self, session: &Session, expected: &str) -> SuiteResult<()> {
        wait_for_text(
            session,
            PROMPT_RESULT,
            expected,
            ALERT_RESULT_TIMEOUT_MS,
            "Prompt result did not match",
        )
        .await
    }

    /// Click the timer button and answer the alert once it shows
    pub async fn handle_delayed_alert(&self, session: &Session, expected: &str, timeout_ms: u64) -> SuiteResult<()> {
        session.click_detached(TIMER_ALERT_BUTTON).await?;
        self.answer_alert(session, timeout_ms, "Delayed alert", Some(expected), true)
            .await
    }

    /// Wait for the alert, check its text and accept or dismiss it.
    ///
    /// An alert that never appears, or closes before it is answered, is only
    /// logged. A text different from `expected` fails the test, after the
    /// alert has been answered so it cannot block the next case.
    async fn answer_alert(
        &self,
        session: &Session,
        timeout_ms: u64,
        kind: &str,
        expected: Option<&str>,
        accept: bool,
    ) -> SuiteResult<()> {
        if session
            .wait_for_alert(timeout_ms, &format!("{kind} did not appear"))
            .await
            .is_err()
        {
            tracing::warn!("{kind} never appeared.");
            return Ok(());
        }

        let mismatch = match (expected, session.alert_text()) {
            (Some(expected), Ok(actual)) => crate::assertion::equals(&actual.as_str(), &expected).err(),
            (Some(_), Err(e)) => {
                tracing::warn!(error = %e, "Could not read {kind} text.");
                None
            }
            (None, _) => None,
        };

        if session.is_alert_open() {
            let answered = if accept {
                session.accept_alert().await
            } else {
                session.dismiss_alert().await
            };
            if let Err(e) = answered {
                tracing::warn!(error = %e, "{kind} disappeared before it was answered.");
            }
        }

        mismatch.map_or(Ok(()), Err)
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Heading text inside an iframe
    pub async fn switch_to_frame_and_get_text(&self, session: &mut Session, frame: &str) -> SuiteResult<String> {
        session.wait_for_exist(frame, FRAME_TIMEOUT_MS).await?;
        session.scroll_into_view(frame).await?;
        session.switch_frame(frame).await?;
        let text = session.get_text(FRAME_HEADING).await;
        session.switch_to_parent_frame();
        text
    }

    /// Whether the heading inside an iframe is displayed
    pub async fn is_frame_content_fully_visible(&self, session: &mut Session, frame: &str) -> SuiteResult<bool> {
        session.wait_for_exist(frame, FRAME_TIMEOUT_MS).await?;
        session.scroll_into_view(frame).await?;
        session.switch_frame(frame).await?;
        session.pause(300).await;
        let visible = session.is_visible(FRAME_HEADING).await;
        session.switch_to_parent_frame();
        visible
    }

    /// Body texts of the parent frame and of the iframe inside it
    pub async fn nested_frame_texts(&self, session: &mut Session) -> SuiteResult<NestedFrameTexts> {
        session.wait_for_exist(FRAME_1, 5_000).await?;
        session.scroll_into_view(FRAME_1).await?;
        session.switch_frame(FRAME_1).await?;
        let texts = async {
            let parent_text = session.text_now("body").await?;
            session.wait_for_exist("iframe", FRAME_TIMEOUT_MS).await?;
            session.switch_frame("iframe").await?;
            let child_text = session.text_now("body").await?;
            Ok::<_, SuiteError>(NestedFrameTexts {
                parent_text: parent_text.trim().to_string(),
                child_text: child_text.trim().to_string(),
            })
        }
        .await;
        session.switch_to_main_frame();
        texts
    }

    // ========================================================================
    // Modal dialogs
    // ========================================================================

    /// Open a modal, read it and close it again
    pub async fn handle_modal_dialog(&self, session: &Session, size: ModalSize) -> SuiteResult<ModalContent> {
        session.scroll_into_view(size.open_button()).await?;
        session.click(size.open_button()).await?;
        session.wait_until_visible(MODAL_TITLE, MODAL_TIMEOUT_MS).await?;
        session.wait_until_visible(MODAL_BODY, MODAL_TIMEOUT_MS).await?;
        let title = session.text_now(MODAL_TITLE).await?;
        let body = session.text_now(MODAL_BODY).await?;
        session
            .wait_and_click(size.close_button(), MODAL_TIMEOUT_MS)
            .await?;
        session
            .wait_until_disappears(MODAL_TITLE, MODAL_TIMEOUT_MS)
            .await?;
        Ok(ModalContent { title, body })
    }
}

async fn wait_for_text(
    session: &Session,
    selector: &str,
    expected: &str,
    timeout_ms: u64,
    message: &str,
) -> SuiteResult<()> {
    let options = WaitOptions::new()
        .with_timeout(timeout_ms)
        .with_message(format!("{message}: {expected}"));
    let locator = session.locate(Locator::parse(selector));
    let target = &locator;
    wait::wait_until(&options, || async move {
        session.page().text(target).await.map(|text| text == expected)
    })
    .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_buttons() {
        assert_eq!(ModalSize::Small.open_button(), "#showSmallModal");
        assert_eq!(ModalSize::Small.close_button(), "#closeSmallModal");
        assert_eq!(ModalSize::Large.open_button(), "#showLargeModal");
        assert_eq!(ModalSize::Large.close_button(), "#closeLargeModal");
    }

    #[test]
    fn test_timeouts() {
        assert!(DELAYED_ALERT_TIMEOUT_MS > ALERT_TIMEOUT_MS);
        assert_eq!(ALERT_RESULT_TIMEOUT_MS, 2_000);
    }

    #[test]
    fn test_page_path() {
        assert_eq!(AlertsFrameWindowsPage::new().path(), "/alertsWindows");
    }
}
