//! Per-test browser session.
//!
//! A [`Session`] is what page objects drive: it owns the browser, knows the
//! current tab and frame, resolves paths against the base URL and carries
//! the generic page helpers (click when clickable, type when displayed, ...).

use crate::browser::{Browser, Page};
use crate::config::SuiteConfig;
use crate::console::ConsoleLog;
use crate::dialog::DialogAction;
use crate::file_ops::{FileInput, Fixtures};
use crate::input::{Key, Point, Rect, Size};
use crate::locator::{Locator, Selector};
use crate::result::{SuiteError, SuiteResult};
use crate::wait::{self, WaitOptions, WaitResult};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Timeout the base helpers wait for visibility/clickability
pub const HELPER_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// Session pool
// ============================================================================

/// Starts sessions for one configuration, at most `max_instances` alive at once
#[derive(Debug, Clone)]
pub struct SessionPool {
    config: SuiteConfig,
    slots: Arc<Semaphore>,
}

impl SessionPool {
    /// Pool sized by the configuration's `max_instances` (at least one)
    #[must_use]
    pub fn new(config: SuiteConfig) -> Self {
        let slots = Arc::new(Semaphore::new(config.browser.max_instances.max(1) as usize));
        Self { config, slots }
    }

    /// Configuration sessions are started with
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Sessions that could start right now
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> SuiteResult<OwnedSemaphorePermit> {
        Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|e| SuiteError::BrowserLaunch {
                message: format!("session pool closed: {e}"),
            })
    }

    /// Launch a session once a slot is free; the slot is held until the
    /// session is closed or dropped
    pub async fn start(&self) -> SuiteResult<Session> {
        let slot = self.acquire().await?;
        tracing::debug!(available = self.available(), "session slot taken");
        let mut session = Session::launch(self.config.clone()).await?;
        session.slot = Some(slot);
        Ok(session)
    }
}

// ============================================================================
// Session
// ============================================================================

/// Browser session shared by the page objects of one test run
#[derive(Debug)]
pub struct Session {
    config: SuiteConfig,
    fixtures: Fixtures,
    browser: Browser,
    page: Page,
    pages: HashMap<String, Page>,
    frames: Vec<Selector>,
    slot: Option<OwnedSemaphorePermit>,
}

impl Session {
    /// Launch a browser for `config` and open a blank tab, outside any pool
    pub async fn start(config: SuiteConfig) -> SuiteResult<Self> {
        SessionPool::new(config).start().await
    }

    async fn launch(config: SuiteConfig) -> SuiteResult<Self> {
        config.validate()?;
        let fixtures = Fixtures::new(config.fixtures_dir.clone());
        fixtures.ensure_defaults()?;

        let browser = Browser::launch(
            &config.browser,
            Duration::from_millis(config.connection_retry_timeout_ms),
            config.connection_retry_count,
        )
        .await?;
        browser.set_download_dir(&config.download_dir()).await?;

        let page = browser.new_page("about:blank").await?;
        let mut pages = HashMap::new();
        pages.insert(page.target_id(), page.clone());

        Ok(Self {
            config,
            fixtures,
            browser,
            page,
            pages,
            frames: Vec::new(),
            slot: None,
        })
    }

    /// Close the browser and free its pool slot
    pub async fn close(self) -> SuiteResult<()> {
        let Self { browser, slot, .. } = self;
        let closed = browser.close().await;
        drop(slot);
        closed
    }

    /// Configuration of this session
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Fixture files
    #[must_use]
    pub const fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Where the browser saves downloads
    #[must_use]
    pub fn download_dir(&self) -> PathBuf {
        self.config.download_dir()
    }

    /// The current tab
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Console output of the current tab
    #[must_use]
    pub const fn console(&self) -> &ConsoleLog {
        self.page.console()
    }

    // ========================================================================
    // Navigation, frames, windows
    // ========================================================================

    /// Open a path relative to the base URL
    pub async fn open(&mut self, path: &str) -> SuiteResult<()> {
        let url = self.config.url_for(path);
        self.frames.clear();
        self.page.goto(&url).await
    }

    /// Current URL
    pub async fn url(&self) -> SuiteResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Scope a selector to the current frame
    #[must_use]
    pub fn locate(&self, selector: impl Into<Locator>) -> Locator {
        selector.into().within_frames(&self.frames)
    }

    /// Enter an iframe of the current frame
    pub async fn switch_frame(&mut self, frame: impl Into<Locator>) -> SuiteResult<()> {
        let frame = frame.into();
        let scoped = frame.clone().within_frames(&self.frames);
        if !self.page.element_exists(&scoped).await? {
            return Err(SuiteError::ElementNotFound {
                selector: scoped.to_string(),
            });
        }
        self.frames.extend(frame.frames().iter().cloned());
        self.frames.push(frame.selector().clone());
        tracing::debug!(frame = %scoped, "switched frame");
        Ok(())
    }

    /// Leave the current iframe
    pub fn switch_to_parent_frame(&mut self) {
        self.frames.pop();
    }

    /// Return to the top-level document
    pub fn switch_to_main_frame(&mut self) {
        self.frames.clear();
    }

    /// Handle of the current tab
    #[must_use]
    pub fn window_handle(&self) -> String {
        self.page.target_id()
    }

    /// Handles of every tab and window
    pub async fn window_handles(&self) -> SuiteResult<Vec<String>> {
        self.browser.window_handles().await
    }

    /// Make another tab current
    pub async fn switch_to_window(&mut self, handle: &str) -> SuiteResult<()> {
        let page = match self.pages.get(handle) {
            Some(page) => page.clone(),
            None => {
                let page = self.browser.page_for(handle).await?;
                self.pages.insert(handle.to_string(), page.clone());
                page
            }
        };
        page.bring_to_front().await?;
        self.page = page;
        self.frames.clear();
        tracing::debug!(handle, "switched window");
        Ok(())
    }

    /// Close the current tab; switch to another window afterwards
    pub async fn close_window(&mut self) -> SuiteResult<()> {
        let handle = self.page.target_id();
        self.pages.remove(&handle);
        self.page.clone().close().await?;
        tracing::debug!(handle = %handle, "closed window");
        Ok(())
    }

    /// Wait for a window that is not in `before` and return its handle
    pub async fn wait_for_new_window(
        &self,
        before: &[String],
        timeout_ms: u64,
        message: &str,
    ) -> SuiteResult<String> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(message);
        wait::wait_until(&options, || async move {
            self.window_handles()
                .await
                .map(|handles| handles.len() > before.len())
        })
        .await?;
        self.window_handles()
            .await?
            .into_iter()
            .find(|h| !before.contains(h))
            .ok_or_else(|| SuiteError::Window {
                message: "New window handle was not found".to_string(),
            })
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    /// Whether a JavaScript dialog is open in the current tab
    #[must_use]
    pub fn is_alert_open(&self) -> bool {
        self.page.dialogs().is_open()
    }

    /// Message of the open dialog
    pub fn alert_text(&self) -> SuiteResult<String> {
        self.page
            .dialogs()
            .current()
            .map(|d| d.message().to_string())
            .ok_or_else(|| SuiteError::Dialog {
                message: "no alert is open".to_string(),
            })
    }

    /// Accept the open dialog
    pub async fn accept_alert(&self) -> SuiteResult<()> {
        self.resolve_alert(DialogAction::Accept).await
    }

    /// Dismiss the open dialog
    pub async fn dismiss_alert(&self) -> SuiteResult<()> {
        self.resolve_alert(DialogAction::Dismiss).await
    }

    /// Answer a prompt and accept it
    pub async fn send_alert_text(&self, text: &str) -> SuiteResult<()> {
        self.resolve_alert(DialogAction::AcceptWith(text.to_string()))
            .await
    }

    async fn resolve_alert(&self, action: DialogAction) -> SuiteResult<()> {
        if !self.is_alert_open() {
            return Err(SuiteError::Dialog {
                message: "no alert is open".to_string(),
            });
        }
        self.page.resolve_dialog(&action).await
    }

    /// Wait until a dialog opens
    pub async fn wait_for_alert(&self, timeout_ms: u64, message: &str) -> SuiteResult<()> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(message);
        wait::wait_until(&options, || async move { Ok::<_, SuiteError>(self.is_alert_open()) }).await?;
        Ok(())
    }

    // ========================================================================
    // Keyboard, timing, artifacts
    // ========================================================================

    /// Send keys; a modifier in the list is held while the others are pressed
    pub async fn keys(&self, keys: &[Key]) -> SuiteResult<()> {
        if keys.iter().any(|k| k.is_modifier()) {
            return self.page.press_chord(keys).await;
        }
        for key in keys {
            self.page.press_key(*key, 0).await?;
        }
        Ok(())
    }

    /// Type characters one key at a time
    pub async fn type_keys(&self, text: &str) -> SuiteResult<()> {
        for c in text.chars() {
            self.page.press_key(Key::Char(c), 0).await?;
        }
        Ok(())
    }

    /// Sleep
    pub async fn pause(&self, ms: u64) {
        wait::pause(ms).await;
    }

    /// Poll a condition with this session's default timeout unless overridden
    pub async fn wait_until<F, Fut>(&self, options: &WaitOptions, condition: F) -> SuiteResult<WaitResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SuiteResult<bool>>,
    {
        wait::wait_until(options, condition).await
    }

    /// Default wait options of this session
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new().with_timeout(self.config.wait_timeout_ms)
    }

    /// PNG screenshot of the current tab
    pub async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        self.page.screenshot().await
    }

    /// Page source of the current tab
    pub async fn page_source(&self) -> SuiteResult<String> {
        self.page.content().await
    }

    /// Attach a local file to a file input
    pub async fn upload_file(&self, input: impl Into<Locator>, path: impl Into<PathBuf>) -> SuiteResult<()> {
        let file = FileInput::from_path(path.into())?;
        let locator = self.locate(input);
        self.wait_for_exist(locator.clone(), HELPER_TIMEOUT_MS).await?;
        self.page.upload_file(&locator, &file).await
    }

    // ========================================================================
    // Element waits
    // ========================================================================

    /// Wait until the element is in the DOM
    pub async fn wait_for_exist(&self, selector: impl Into<Locator>, timeout_ms: u64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("element ({loc}) still not existing after {timeout_ms}ms"));
        let page = &self.page;
        let target = &loc;
        wait::wait_until(&options, || async move { page.element_exists(target).await }).await?;
        Ok(())
    }

    /// Wait until the element is displayed
    pub async fn wait_until_visible(&self, selector: impl Into<Locator>, timeout_ms: u64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("element ({loc}) still not displayed after {timeout_ms}ms"));
        let page = &self.page;
        let target = &loc;
        wait::wait_until(&options, || async move { page.is_displayed(target).await }).await?;
        Ok(())
    }

    /// Wait until the element is no longer displayed
    pub async fn wait_until_disappears(
        &self,
        selector: impl Into<Locator>,
        timeout_ms: u64,
    ) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("element ({loc}) still displayed after {timeout_ms}ms"));
        let page = &self.page;
        let target = &loc;
        wait::wait_until(&options, || async move { page.is_displayed(target).await.map(|shown| !shown) })
            .await?;
        Ok(())
    }

    /// Wait until the element is enabled
    pub async fn wait_for_enabled(&self, selector: impl Into<Locator>, timeout_ms: u64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("element ({loc}) still not enabled after {timeout_ms}ms"));
        let page = &self.page;
        let target = &loc;
        wait::wait_until(&options, || async move { page.is_enabled(target).await }).await?;
        Ok(())
    }

    /// Wait until the element is displayed and enabled
    pub async fn wait_for_clickable(&self, selector: impl Into<Locator>, timeout_ms: u64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("element ({loc}) still not clickable after {timeout_ms}ms"));
        let page = &self.page;
        let target = &loc;
        wait::wait_until(&options, || async move {
            Ok::<_, SuiteError>(page.is_displayed(target).await? && page.is_enabled(target).await?)
        })
        .await?;
        Ok(())
    }

    // ========================================================================
    // Base page helpers
    // ========================================================================

    /// Click once the element is clickable
    pub async fn click(&self, selector: impl Into<Locator>) -> SuiteResult<()> {
        self.wait_and_click(selector, HELPER_TIMEOUT_MS).await
    }

    /// Wait up to `timeout_ms` for the element to be clickable, then click
    pub async fn wait_and_click(&self, selector: impl Into<Locator>, timeout_ms: u64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.wait_for_clickable(loc.clone(), timeout_ms).await?;
        self.page.click(&loc).await
    }

    /// Click without waiting, for elements that open dialogs
    pub async fn click_detached(&self, selector: impl Into<Locator>) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.wait_for_clickable(loc.clone(), HELPER_TIMEOUT_MS).await?;
        self.page.click_detached(&loc).await
    }

    /// Replace the value of an input once it is displayed
    pub async fn type_text(&self, selector: impl Into<Locator>, text: &str) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.wait_until_visible(loc.clone(), HELPER_TIMEOUT_MS).await?;
        self.set_value(loc, text).await
    }

    /// Replace the value of an input (clear, focus, type)
    pub async fn set_value(&self, selector: impl Into<Locator>, text: &str) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.page.scroll_into_view(&loc).await?;
        self.page.clear_value(&loc).await?;
        self.page.focus(&loc).await?;
        self.page.insert_text(text).await
    }

    /// Wait for the input, clear it and type
    pub async fn clear_and_type(&self, selector: impl Into<Locator>, text: &str) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.wait_until_visible(loc.clone(), self.config.wait_timeout_ms)
            .await?;
        self.page.clear_value(&loc).await?;
        self.page.focus(&loc).await?;
        self.page.insert_text(text).await
    }

    /// Empty an input
    pub async fn clear_value(&self, selector: impl Into<Locator>) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.page.clear_value(&loc).await
    }

    /// Text of the element once displayed
    pub async fn get_text(&self, selector: impl Into<Locator>) -> SuiteResult<String> {
        let loc = self.locate(selector);
        self.wait_until_visible(loc.clone(), HELPER_TIMEOUT_MS).await?;
        self.page.text(&loc).await
    }

    /// Text of the element without waiting
    pub async fn text_now(&self, selector: impl Into<Locator>) -> SuiteResult<String> {
        let loc = self.locate(selector);
        self.page.text(&loc).await
    }

    /// Value of a form control
    pub async fn get_value(&self, selector: impl Into<Locator>) -> SuiteResult<String> {
        let loc = self.locate(selector);
        self.page.value(&loc).await
    }

    /// Whether the element is displayed (false when absent)
    pub async fn is_visible(&self, selector: impl Into<Locator>) -> SuiteResult<bool> {
        let loc = self.locate(selector);
        self.page.is_displayed(&loc).await
    }

    /// Whether the element is enabled
    pub async fn is_enabled(&self, selector: impl Into<Locator>) -> SuiteResult<bool> {
        let loc = self.locate(selector);
        self.page.is_enabled(&loc).await
    }

    /// Whether the element is checked/selected
    pub async fn is_selected(&self, selector: impl Into<Locator>) -> SuiteResult<bool> {
        let loc = self.locate(selector);
        self.page.is_selected(&loc).await
    }

    /// Whether the element is in the DOM
    pub async fn exists(&self, selector: impl Into<Locator>) -> SuiteResult<bool> {
        let loc = self.locate(selector);
        self.page.element_exists(&loc).await
    }

    /// Scroll the element into view
    pub async fn scroll_into_view(&self, selector: impl Into<Locator>) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.page.scroll_into_view(&loc).await
    }

    /// Fail unless the element's text equals `expected`
    pub async fn assert_text(&self, selector: impl Into<Locator>, expected: &str) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let actual = self.get_text(loc.clone()).await?;
        crate::assertion::equals(&actual, &expected.to_string())
            .map_err(|e| e.context(format!("text of {loc}")))
    }

    /// Attribute value
    pub async fn get_attribute(&self, selector: impl Into<Locator>, name: &str) -> SuiteResult<Option<String>> {
        let loc = self.locate(selector);
        self.page.attribute(&loc, name).await
    }

    /// Computed CSS property
    pub async fn css_property(&self, selector: impl Into<Locator>, name: &str) -> SuiteResult<String> {
        let loc = self.locate(selector);
        self.page.css_property(&loc, name).await
    }

    /// Move the pointer over the element
    pub async fn hover(&self, selector: impl Into<Locator>) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.page.hover(&loc).await
    }

    /// Number of matching elements
    pub async fn element_count(&self, selector: impl Into<Locator>) -> SuiteResult<usize> {
        let loc = self.locate(selector);
        self.page.count(&loc).await
    }

    /// Texts of all matching elements
    pub async fn all_texts(&self, selector: impl Into<Locator>) -> SuiteResult<Vec<String>> {
        let loc = self.locate(selector);
        self.page.all_texts(&loc).await
    }

    /// One attribute of all matching elements
    pub async fn all_attributes(&self, selector: impl Into<Locator>, name: &str) -> SuiteResult<Vec<String>> {
        let loc = self.locate(selector);
        self.page.all_attributes(&loc, name).await
    }

    /// Scroll the window
    pub async fn scroll_by(&self, x: f64, y: f64) -> SuiteResult<()> {
        self.page.scroll_by(x, y).await
    }

    /// Click a checkbox until its checked state equals `checked`
    pub async fn set_checkbox(&self, selector: impl Into<Locator>, checked: bool) -> SuiteResult<()> {
        let loc = self.locate(selector);
        if self.page.is_selected(&loc).await? != checked {
            self.page.click(&loc).await?;
        }
        Ok(())
    }

    /// Choose a `<select>` option by text
    pub async fn select_by_visible_text(&self, selector: impl Into<Locator>, text: &str) -> SuiteResult<()> {
        let loc = self.locate(selector);
        self.wait_for_exist(loc.clone(), HELPER_TIMEOUT_MS).await?;
        self.page.select_by_visible_text(&loc, text).await
    }

    /// Document-relative top-left corner
    pub async fn location(&self, selector: impl Into<Locator>) -> SuiteResult<Point> {
        Ok(self.rect(selector).await?.location())
    }

    /// Rendered size
    pub async fn size(&self, selector: impl Into<Locator>) -> SuiteResult<Size> {
        Ok(self.rect(selector).await?.size())
    }

    /// Document-relative rectangle
    pub async fn rect(&self, selector: impl Into<Locator>) -> SuiteResult<Rect> {
        let loc = self.locate(selector);
        self.page.rect(&loc).await
    }

    /// Drag the element onto another element's centre
    pub async fn drag_and_drop(
        &self,
        source: impl Into<Locator>,
        target: impl Into<Locator>,
    ) -> SuiteResult<()> {
        let source = self.locate(source);
        let target = self.locate(target);
        self.page.scroll_into_view(&source).await?;
        self.page.scroll_into_view(&target).await?;
        let to = self.page.center(&target).await?;
        let from = self.page.center(&source).await?;
        self.page
            .drag(from, to, crate::browser::DRAG_STEPS)
            .await
    }

    /// Drag the element by an offset from its centre
    pub async fn drag_by_offset(&self, selector: impl Into<Locator>, dx: f64, dy: f64) -> SuiteResult<()> {
        let loc = self.locate(selector);
        let from = self.page.center(&loc).await?;
        self.page
            .drag(from, from.offset(dx, dy), crate::browser::DRAG_STEPS)
            .await
    }
}
