//! DemoQA Alerts, Frame & Windows Section

use super::navigate;
use crate::assertion;
use crate::harness::{CaseFuture, TestSuite};
use crate::page_object::{AlertsFrameWindowsMenu, CardName};
use crate::pages::alerts_frames_windows::{
    ALERT_RESULT_TIMEOUT_MS, DELAYED_ALERT_TIMEOUT_MS, FRAME_1, FRAME_2,
};
use crate::pages::{AlertsFrameWindowsPage, ModalSize};
use crate::session::Session;

const SAMPLE_PAGE: &str = "This is a sample page";

/// The Alerts, Frame & Windows suite
#[must_use]
pub fn suite() -> TestSuite<Session> {
    TestSuite::new("DemoQA Alerts, Frame & Windows Section")
        .case("Browser Windows - should handle tab and window navigation", browser_windows)
        .case("Alerts - should handle simple, confirm, prompt, and delayed alerts", alerts)
        .case("Frames - should verify text in both frames is same and visible", frames)
        .case("Nested Frames - should verify content in parent and child frames", nested_frames)
        .case(
            "Modal Dialogs - should open and close small and large modals with correct content",
            modal_dialogs,
        )
}

fn browser_windows(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::AlertsFrameWindows, AlertsFrameWindowsMenu::BrowserWindows).await?;
        let page = AlertsFrameWindowsPage::new();

        page.open_new_tab_and_validate(session, SAMPLE_PAGE).await?;
        page.open_new_window_and_validate(session, SAMPLE_PAGE).await?;
        page.open_new_window_message_and_validate(session).await
    })
}

fn alerts(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::AlertsFrameWindows, AlertsFrameWindowsMenu::Alerts).await?;
        let page = AlertsFrameWindowsPage::new();

        page.handle_simple_alert(session, Some("You clicked a button")).await?;
        page.handle_confirm_alert(session, false, Some("Do you confirm action?"))
            .await?;
        page.wait_for_alert_result(session, "You selected Cancel", ALERT_RESULT_TIMEOUT_MS)
            .await?;
        page.handle_delayed_alert(
            session,
            "This alert appeared after 5 seconds",
            DELAYED_ALERT_TIMEOUT_MS,
        )
        .await
    })
}

fn frames(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::AlertsFrameWindows, AlertsFrameWindowsMenu::Frames).await?;
        let page = AlertsFrameWindowsPage::new();

        let frame1_text = page.switch_to_frame_and_get_text(session, FRAME_1).await?;
        let frame2_text = page.switch_to_frame_and_get_text(session, FRAME_2).await?;
        assertion::equals(frame1_text.as_str(), SAMPLE_PAGE)?;
        assertion::equals(frame2_text.as_str(), SAMPLE_PAGE)?;

        assertion::is_true(
            page.is_frame_content_fully_visible(session, FRAME_1).await?,
            "frame1 content is visible",
        )?;
        assertion::is_true(
            page.is_frame_content_fully_visible(session, FRAME_2).await?,
            "frame2 content is visible",
        )
    })
}

fn nested_frames(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::AlertsFrameWindows, AlertsFrameWindowsMenu::NestedFrames).await?;
        let page = AlertsFrameWindowsPage::new();

        let texts = page.nested_frame_texts(session).await?;
        assertion::contains(&texts.parent_text, "Parent frame")?;
        assertion::equals(texts.child_text.as_str(), "Child Iframe")
    })
}

fn modal_dialogs(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::AlertsFrameWindows, AlertsFrameWindowsMenu::ModalDialogs).await?;
        let page = AlertsFrameWindowsPage::new();

        let small = page.handle_modal_dialog(session, ModalSize::Small).await?;
        assertion::equals(small.title.as_str(), "Small Modal")?;
        assertion::contains(&small.body, "This is a small modal.")?;

        let large = page.handle_modal_dialog(session, ModalSize::Large).await?;
        assertion::equals(large.title.as_str(), "Large Modal")?;
        assertion::contains(
            &large.body,
            "Lorem Ipsum is simply dummy text of the printing and typesetting industry.",
        )
    })
}
