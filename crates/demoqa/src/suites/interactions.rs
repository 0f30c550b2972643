//! DemoQA Interactions Section

use super::{navigate, nth};
use crate::assertion;
use crate::harness::{CaseFuture, TestSuite};
use crate::locator::Locator;
use crate::page_object::{CardName, InteractionsMenu};
use crate::pages::interactions::{
    manhattan_distance, ACCEPTABLE, ACCEPT_DROP_TARGET, CONTAINED_BOX, CONTAINED_IN_PARENT, CURSOR_BOTTOM,
    CURSOR_CENTER, CURSOR_TOP_LEFT, DRAG_TAB_AXIS, DRAG_TAB_CONTAINER, DRAG_TAB_CURSOR, DRAG_TAB_SIMPLE,
    DROP_TAB_ACCEPT, DROP_TAB_PREVENT_PROPAGATION, DROP_TAB_REVERT, DROP_TAB_SIMPLE, FREE_BOX, FREE_BOX_HANDLE,
    GRID_TAB, LIST_TAB, NOT_ACCEPTABLE, NOT_GREEDY_INNER_BOX, NOT_REVERT, ONLY_X, ONLY_Y, PREVENT_DRAG_BOX,
    RESTRICTED_BOX, RESTRICTED_BOX_HANDLE, REVERT_DROP_TARGET, SELECTABLE_GRID_ITEMS, SELECTABLE_LIST_ITEMS,
    SIMPLE_DRAGGABLE, SIMPLE_DRAG_BOX, SIMPLE_DROP_TARGET, SORTABLE_GRID_ITEMS, SORTABLE_LIST_ITEMS, WILL_REVERT,
};
use crate::pages::InteractionsPage;
use crate::result::SuiteResult;
use crate::session::Session;

/// Manhattan distance under which an element counts as not moved
const REVERT_TOLERANCE: f64 = 10.0;
/// How long the revert animation gets to finish
const REVERT_SETTLE_MS: u64 = 1_500;
/// Slack for sub-pixel layout on constrained axes
const AXIS_TOLERANCE: f64 = 2.0;

/// The Interactions suite
#[must_use]
pub fn suite() -> TestSuite<Session> {
    TestSuite::new("DemoQA Interactions Section")
        .case("Sortable - should allow reordering list items via drag and drop", sortable)
        .case("Selectable - should allow multiple list and grid items to be selected", selectable)
        .case("Resizable - should change dimensions of resizable boxes", resizable)
        .case("Droppable - should drop elements to drop targets correctly", droppable)
        .case("Draggable - should move elements according to restrictions", draggable)
}

/// Drag item 0 onto item `to` and check it landed there
async fn check_sort(session: &Session, items: &str, to: usize) -> SuiteResult<()> {
    let page = InteractionsPage::new();
    let before = page.item_texts(session, items).await?;
    page.drag_element(session, Locator::css(items).nth(0), Locator::css(items).nth(to))
        .await?;
    let after = page.item_texts(session, items).await?;
    assertion::is_true(after != before, &format!("order changed from {before:?}"))?;
    assertion::equals(nth(&after, to), nth(&before, 0))
}

fn sortable(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Interactions, InteractionsMenu::Sortable).await?;
        let page = InteractionsPage::new();

        page.click_tab(session, LIST_TAB).await?;
        check_sort(session, SORTABLE_LIST_ITEMS, 4).await?;

        page.click_tab(session, GRID_TAB).await?;
        check_sort(session, SORTABLE_GRID_ITEMS, 8).await
    })
}

/// Click the given items and check each became active
async fn check_selection(session: &Session, items: &str, picks: [usize; 3]) -> SuiteResult<()> {
    let page = InteractionsPage::new();
    for index in picks {
        page.click_item(session, items, index).await?;
    }
    let classes = page.item_classes(session, items).await?;
    for index in picks {
        assertion::contains(nth(&classes, index), "active")
            .map_err(|e| e.context(format!("{items} item {index}")))?;
    }
    Ok(())
}

fn selectable(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Interactions, InteractionsMenu::Selectable).await?;
        let page = InteractionsPage::new();

        page.click_tab(session, LIST_TAB).await?;
        check_selection(session, SELECTABLE_LIST_ITEMS, [0, 2, 3]).await?;

        page.click_tab(session, GRID_TAB).await?;
        check_selection(session, SELECTABLE_GRID_ITEMS, [1, 4, 7]).await
    })
}

/// Drag a handle and check the box grew both ways
async fn check_resize(session: &Session, item: &str, handle: &str, dx: f64, dy: f64) -> SuiteResult<()> {
    let page = InteractionsPage::new();
    let before = page.element_size(session, item).await?;
    page.resize_element(session, handle, dx, dy).await?;
    let after = page.element_size(session, item).await?;
    assertion::greater_than(after.width, before.width)?;
    assertion::greater_than(after.height, before.height)
}

fn resizable(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Interactions, InteractionsMenu::Resizable).await?;
        check_resize(session, RESTRICTED_BOX, RESTRICTED_BOX_HANDLE, 50.0, 30.0).await?;
        check_resize(session, FREE_BOX, FREE_BOX_HANDLE, 60.0, 60.0).await
    })
}

/// Drop `source` on `target` and give back how far it ended up from its start
async fn drop_and_measure(session: &Session, source: &str, target: &str) -> SuiteResult<f64> {
    let page = InteractionsPage::new();
    let start = page.element_location(session, source).await?;
    page.perform_drag_and_drop(session, source, target).await?;
    session.pause(REVERT_SETTLE_MS).await;
    let end = page.element_location(session, source).await?;
    Ok(manhattan_distance(start, end))
}

fn droppable(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Interactions, InteractionsMenu::Droppable).await?;
        let page = InteractionsPage::new();

        page.click_tab(session, DROP_TAB_SIMPLE).await?;
        page.perform_drag_and_drop(session, SIMPLE_DRAGGABLE, SIMPLE_DROP_TARGET)
            .await?;
        let simple = page.drop_target_text(session, SIMPLE_DROP_TARGET).await?;
        assertion::equals(simple.trim(), "Dropped!")?;

        page.click_tab(session, DROP_TAB_ACCEPT).await?;
        page.perform_drag_and_drop(session, ACCEPTABLE, ACCEPT_DROP_TARGET)
            .await?;
        let accepted = page.drop_target_text(session, ACCEPT_DROP_TARGET).await?;
        assertion::equals(accepted.trim(), "Dropped!")?;

        page.perform_drag_and_drop(session, NOT_ACCEPTABLE, ACCEPT_DROP_TARGET)
            .await?;
        let still = page.drop_target_text(session, ACCEPT_DROP_TARGET).await?;
        assertion::equals(still.trim(), "Dropped!")?;

        page.click_tab(session, DROP_TAB_PREVENT_PROPAGATION).await?;
        page.perform_drag_and_drop(session, PREVENT_DRAG_BOX, NOT_GREEDY_INNER_BOX)
            .await?;
        assertion::contains(
            &page.drop_target_text(session, NOT_GREEDY_INNER_BOX).await?,
            "Dropped",
        )?;

        page.click_tab(session, DROP_TAB_REVERT).await?;
        let reverted = drop_and_measure(session, WILL_REVERT, REVERT_DROP_TARGET).await?;
        assertion::less_than(reverted, REVERT_TOLERANCE)
            .map_err(|e| e.context("revertable box"))?;
        let kept = drop_and_measure(session, NOT_REVERT, REVERT_DROP_TARGET).await?;
        assertion::greater_than(kept, REVERT_TOLERANCE)
            .map_err(|e| e.context("non-revertable box"))
    })
}

fn draggable(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Interactions, InteractionsMenu::Dragabble).await?;
        let page = InteractionsPage::new();

        page.click_tab(session, DRAG_TAB_SIMPLE).await?;
        let start = page.element_location(session, SIMPLE_DRAG_BOX).await?;
        page.drag_element_by_offset(session, SIMPLE_DRAG_BOX, 100.0, 100.0)
            .await?;
        let end = page.element_location(session, SIMPLE_DRAG_BOX).await?;
        assertion::greater_than(end.x, start.x)?;
        assertion::greater_than(end.y, start.y)?;

        page.click_tab(session, DRAG_TAB_AXIS).await?;
        let start = page.element_location(session, ONLY_X).await?;
        page.drag_element_by_offset(session, ONLY_X, 100.0, 100.0).await?;
        let end = page.element_location(session, ONLY_X).await?;
        assertion::greater_than(end.x, start.x)?;
        assertion::close_to(end.y, start.y, AXIS_TOLERANCE)?;

        let start = page.element_location(session, ONLY_Y).await?;
        page.drag_element_by_offset(session, ONLY_Y, 100.0, 100.0).await?;
        let end = page.element_location(session, ONLY_Y).await?;
        assertion::greater_than(end.y, start.y)?;
        assertion::close_to(end.x, start.x, AXIS_TOLERANCE)?;

        page.click_tab(session, DRAG_TAB_CONTAINER).await?;
        let start = page.element_location(session, CONTAINED_BOX).await?;
        page.drag_element_by_offset(session, CONTAINED_BOX, 300.0, 0.0).await?;
        let end = page.element_location(session, CONTAINED_BOX).await?;
        assertion::greater_than(end.x, start.x)?;
        assertion::equals(&end.y, &start.y)?;

        let start = page.element_location(session, CONTAINED_IN_PARENT).await?;
        page.drag_element_by_offset(session, CONTAINED_IN_PARENT, 0.0, 100.0)
            .await?;
        let end = page.element_location(session, CONTAINED_IN_PARENT).await?;
        assertion::greater_than(end.y, start.y - 1.0)?;
        assertion::equals(&end.x, &start.x)?;

        page.click_tab(session, DRAG_TAB_CURSOR).await?;
        let start = page.element_location(session, CURSOR_TOP_LEFT).await?;
        page.drag_element_by_offset(session, CURSOR_TOP_LEFT, 100.0, 100.0)
            .await?;
        let end = page.element_location(session, CURSOR_TOP_LEFT).await?;
        assertion::greater_than(end.x, start.x)?;
        assertion::greater_than(end.y, start.y)?;

        let start = page.element_location(session, CURSOR_CENTER).await?;
        page.drag_element_by_offset(session, CURSOR_CENTER, -50.0, -50.0)
            .await?;
        let end = page.element_location(session, CURSOR_CENTER).await?;
        assertion::less_than(end.x, start.x)?;
        assertion::less_than(end.y, start.y)?;

        let start = page.element_location(session, CURSOR_BOTTOM).await?;
        page.drag_element_by_offset(session, CURSOR_BOTTOM, 70.0, 70.0).await?;
        let end = page.element_location(session, CURSOR_BOTTOM).await?;
        assertion::greater_than(end.x, start.x)?;
        assertion::at_least(end.y, start.y)
    })
}
