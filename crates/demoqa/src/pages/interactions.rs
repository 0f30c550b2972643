//! Interactions section: sortable, selectable, resizable, droppable and
//! draggable demos. All pointer work goes through real mouse drags.

use crate::input::{Point, Size};
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::SuiteResult;
use crate::session::Session;

// Sortable and selectable share the tab ids
pub const LIST_TAB: &str = "#demo-tab-list";
pub const GRID_TAB: &str = "#demo-tab-grid";
pub const SORTABLE_LIST_ITEMS: &str = "#demo-tabpane-list .list-group-item";
pub const SORTABLE_GRID_ITEMS: &str = "#demo-tabpane-grid .list-group-item";
pub const SELECTABLE_LIST_ITEMS: &str = "#verticalListContainer .list-group-item";
pub const SELECTABLE_GRID_ITEMS: &str = "#gridContainer .list-group-item";

// Resizable
pub const RESTRICTED_BOX: &str = "#resizableBoxWithRestriction";
pub const RESTRICTED_BOX_HANDLE: &str = "#resizableBoxWithRestriction .react-resizable-handle";
pub const FREE_BOX: &str = "#resizable";
pub const FREE_BOX_HANDLE: &str = "#resizable .react-resizable-handle";

// Droppable
pub const DROP_TAB_SIMPLE: &str = "#droppableExample-tab-simple";
pub const DROP_TAB_ACCEPT: &str = "#droppableExample-tab-accept";
pub const DROP_TAB_PREVENT_PROPAGATION: &str = "#droppableExample-tab-preventPropogation";
pub const DROP_TAB_REVERT: &str = "#droppableExample-tab-revertable";
pub const SIMPLE_DRAGGABLE: &str = "#draggable";
pub const SIMPLE_DROP_TARGET: &str = "#simpleDropContainer #droppable";
pub const ACCEPTABLE: &str = "#acceptable";
pub const NOT_ACCEPTABLE: &str = "#notAcceptable";
pub const ACCEPT_DROP_TARGET: &str = "#acceptDropContainer #droppable";
pub const PREVENT_DRAG_BOX: &str = "#dragBox";
pub const NOT_GREEDY_INNER_BOX: &str = "#notGreedyInnerDropBox";
pub const GREEDY_INNER_BOX: &str = "#greedyDropBoxInner";
pub const WILL_REVERT: &str = "#revertable";
pub const NOT_REVERT: &str = "#notRevertable";
pub const REVERT_DROP_TARGET: &str = "#revertableDropContainer #droppable";

// Draggable
pub const DRAG_TAB_SIMPLE: &str = "#draggableExample-tab-simple";
pub const DRAG_TAB_AXIS: &str = "#draggableExample-tab-axisRestriction";
pub const DRAG_TAB_CONTAINER: &str = "#draggableExample-tab-containerRestriction";
pub const DRAG_TAB_CURSOR: &str = "#draggableExample-tab-cursorStyle";
pub const SIMPLE_DRAG_BOX: &str = "#dragBox";
pub const ONLY_X: &str = "#restrictedX";
pub const ONLY_Y: &str = "#restrictedY";
pub const CONTAINED_BOX: &str = "#containmentWrapper .draggable";
pub const CONTAINED_IN_PARENT: &str = "#containmentWrapper + .draggable";
pub const CURSOR_TOP_LEFT: &str = "#cursorCenter + .drag-box";
pub const CURSOR_CENTER: &str = "#cursorCenter";
pub const CURSOR_BOTTOM: &str = "#cursorBottom";

/// Manhattan distance between two points
#[must_use]
pub fn manhattan_distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// The Interactions section
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionsPage;

impl PageObject for InteractionsPage {
    fn path(&self) -> &str {
        "/interaction"
    }

    fn page_name(&self) -> &str {
        "interactions"
    }
}

impl InteractionsPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Scroll to a tab and click it
    pub async fn click_tab(&self, session: &Session, tab: &str) -> SuiteResult<()> {
        session.scroll_into_view(tab).await?;
        session.click(tab).await
    }

    /// Texts of every matching item, in DOM order
    pub async fn item_texts(&self, session: &Session, items: &str) -> SuiteResult<Vec<String>> {
        session.all_texts(items).await
    }

    /// Class attributes of every matching item
    pub async fn item_classes(&self, session: &Session, items: &str) -> SuiteResult<Vec<String>> {
        session.all_attributes(items, "class").await
    }

    /// Click the `index`-th matching item
    pub async fn click_item(&self, session: &Session, items: &str, index: usize) -> SuiteResult<()> {
        session.click(Locator::css(items).nth(index)).await
    }

    /// Drag one item onto another (sortable)
    pub async fn drag_element(
        &self,
        session: &Session,
        source: impl Into<Locator>,
        target: impl Into<Locator>,
    ) -> SuiteResult<()> {
        session.drag_and_drop(source, target).await
    }

    /// Drag a resize handle by an offset
    pub async fn resize_element(&self, session: &Session, handle: &str, dx: f64, dy: f64) -> SuiteResult<()> {
        session.scroll_into_view(handle).await?;
        session.drag_by_offset(handle, dx, dy).await
    }

    /// Rendered size of an element
    pub async fn element_size(&self, session: &Session, element: &str) -> SuiteResult<Size> {
        session.size(element).await
    }

    /// Drag a draggable onto a drop target (droppable)
    pub async fn perform_drag_and_drop(&self, session: &Session, source: &str, target: &str) -> SuiteResult<()> {
        session.drag_and_drop(source, target).await
    }

    /// Text of a drop target
    pub async fn drop_target_text(&self, session: &Session, target: &str) -> SuiteResult<String> {
        session.text_now(target).await
    }

    /// Document-relative location of an element
    pub async fn element_location(&self, session: &Session, element: &str) -> SuiteResult<Point> {
        session.location(element).await
    }

    /// Drag an element by an offset (draggable)
    pub async fn drag_element_by_offset(&self, session: &Session, element: &str, dx: f64, dy: f64) -> SuiteResult<()> {
        session.scroll_into_view(element).await?;
        session.drag_by_offset(element, dx, dy).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Point::new(10.0, 20.0);
        assert_eq!(manhattan_distance(a, a), 0.0);
        assert_eq!(manhattan_distance(a, Point::new(13.0, 16.0)), 7.0);
    }

    #[test]
    fn test_nested_selectors_stay_css() {
        assert_eq!(
            Locator::parse(CONTAINED_IN_PARENT).to_string(),
            "#containmentWrapper + .draggable"
        );
        assert_eq!(Locator::css(SORTABLE_LIST_ITEMS).nth(4).to_string(), "#demo-tabpane-list .list-group-item[4]");
    }
}
