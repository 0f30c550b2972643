//! DemoQA Widgets Section

use super::navigate;
use crate::assertion;
use crate::harness::{CaseFuture, TestSuite};
use crate::page_object::{CardName, WidgetsMenu};
use crate::pages::widgets::PROGRESS_TIMEOUT_MS;
use crate::pages::WidgetsPage;
use crate::session::Session;

/// The Widgets suite
#[must_use]
pub fn suite() -> TestSuite<Session> {
    TestSuite::new("DemoQA Widgets Section")
        .case("Accordion - should expand all sections and verify content is displayed", accordion)
        .case("Auto Complete - should allow multi and single color selection and removal", auto_complete)
        .case("Date Picker - should allow manual and UI date/time selection", date_picker)
        .case("Slider - should move slider to a specific value", slider)
        .case("Progress Bar - should pause, complete to 100%, and reset to 0", progress_bar)
}

fn accordion(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Widgets, WidgetsMenu::Accordian).await?;
        WidgetsPage::new().validate_all_sections(session).await
    })
}

fn auto_complete(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Widgets, WidgetsMenu::AutoComplete).await?;
        let page = WidgetsPage::new();

        let colors = ["Red", "Green", "Blue"];
        page.enter_multi_colors(session, &colors).await?;
        let selected = page.selected_multi_colors(session).await?;
        let expected: Vec<String> = colors.iter().map(ToString::to_string).collect();
        assertion::has_members(&selected, &expected)?;

        page.remove_multi_color(session, "Green").await?;
        let updated = page.selected_multi_colors(session).await?;
        assertion::is_false(
            updated.iter().any(|c| c == "Green"),
            &format!("{updated:?} still includes Green"),
        )?;
        assertion::has_length(&updated, 2)?;

        page.enter_single_color(session, "Purple").await?;
        assertion::equals(page.selected_single_color(session).await?.as_str(), "Purple")
    })
}

fn date_picker(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Widgets, WidgetsMenu::DatePicker).await?;
        let page = WidgetsPage::new();

        let manual = "05/15/2020";
        page.enter_date(session, manual).await?;
        assertion::equals(page.date_value(session).await?.as_str(), manual)?;

        page.pick_date_via_ui(session).await?;
        assertion::contains(&page.date_value(session).await?, "05/15")?;

        page.enter_date_time(session, "May 15, 2020 3:45 PM").await?;
        assertion::contains(&page.date_time_value(session).await?, "May 15, 2020")
    })
}

fn slider(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Widgets, WidgetsMenu::Slider).await?;
        let page = WidgetsPage::new();

        page.move_slider_to(session, 75).await?;
        assertion::equals(&page.slider_value(session).await?, &75)
    })
}

fn progress_bar(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Widgets, WidgetsMenu::ProgressBar).await?;
        let page = WidgetsPage::new();

        page.start_progress_bar(session).await?;
        page.wait_for_progress_to_reach(session, 40, PROGRESS_TIMEOUT_MS)
            .await?;
        page.start_progress_bar(session).await?;
        assertion::at_least(page.progress_bar_value(session).await?, 40)?;

        page.start_progress_bar(session).await?;
        page.wait_for_progress_to_reach(session, 100, PROGRESS_TIMEOUT_MS)
            .await?;
        session.pause(2_000).await;

        page.reset_progress_bar(session).await?;
        session.pause(2_000).await;
        assertion::equals(&page.progress_bar_value(session).await?, &0)
    })
}
