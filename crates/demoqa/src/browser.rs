//! Browser control over the Chrome `DevTools` Protocol.
//!
//! Thin wrappers around chromiumoxide: [`Browser`] owns the Chromium process
//! and its handler task, [`Page`] wraps one tab. Element work goes through
//! JavaScript generated by [`Locator`]; clicks, drags and keys go through CDP
//! `Input` events so the application sees real pointer and keyboard input.

use crate::config::Capabilities;
use crate::console::{ConsoleLog, ConsoleMessage};
use crate::dialog::{Dialog, DialogAction, DialogTracker};
use crate::file_ops::FileInput;
use crate::input::{drag_path, Key, Point, Rect};
use crate::locator::{js_string, Locator};
use crate::result::{SuiteError, SuiteResult};
use crate::wait::{wait_until, WaitOptions};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::log::EventEntryAdded;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, InsertTextParams, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams, EventJavascriptDialogClosed,
    EventJavascriptDialogOpening, NavigateParams,
};
use chromiumoxide::cdp::browser_protocol::target::GetTargetsParams;
use chromiumoxide::cdp::js_protocol::runtime::{
    EvaluateParams, EvaluateReturns, EventConsoleApiCalled, ExceptionDetails,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Steps used for pointer drags
pub const DRAG_STEPS: u32 = 10;

/// Delay between drag moves
const DRAG_STEP_DELAY_MS: u64 = 20;

/// How long an eager navigation may take to reach `DOMContentLoaded`
pub const NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageLoad {
    /// The `load` event (images, stylesheets and iframes included)
    #[default]
    Full,
    /// `DOMContentLoaded`
    Eager,
}

impl PageLoad {
    /// Strategy for the `page_load_eager` capability
    #[must_use]
    pub const fn from_eager(eager: bool) -> Self {
        if eager {
            Self::Eager
        } else {
            Self::Full
        }
    }

    /// Whether a `document.readyState` value means the navigation is done
    #[must_use]
    pub fn is_ready(self, ready_state: &str) -> bool {
        match self {
            Self::Full => ready_state == "complete",
            Self::Eager => matches!(ready_state, "interactive" | "complete"),
        }
    }
}

// ============================================================================
// Browser
// ============================================================================

/// A Chromium instance with a live CDP connection
#[derive(Debug)]
pub struct Browser {
    inner: CdpBrowser,
    handle: tokio::task::JoinHandle<()>,
    load: PageLoad,
}

impl Browser {
    /// Launch Chromium, retrying up to `attempts` times
    pub async fn launch(
        caps: &Capabilities,
        request_timeout: Duration,
        attempts: u32,
    ) -> SuiteResult<Self> {
        let mut last_error = None;
        for attempt in 1..=attempts.max(1) {
            match Self::launch_once(caps, request_timeout).await {
                Ok(browser) => return Ok(browser),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "browser launch failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| SuiteError::BrowserLaunch {
            message: "no launch attempt was made".to_string(),
        }))
    }

    async fn launch_once(caps: &Capabilities, request_timeout: Duration) -> SuiteResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(caps.window_width, caps.window_height)
            .viewport(None::<Viewport>)
            .request_timeout(request_timeout)
            .args(caps.args.clone());

        if !caps.headless {
            builder = builder.with_head();
        }

        if !caps.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = caps.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| SuiteError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| SuiteError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        tracing::info!(
            headless = caps.headless,
            eager = caps.page_load_eager,
            width = caps.window_width,
            height = caps.window_height,
            "browser launched"
        );
        Ok(Self {
            inner: browser,
            handle,
            load: PageLoad::from_eager(caps.page_load_eager),
        })
    }

    /// Open a new tab
    pub async fn new_page(&self, url: &str) -> SuiteResult<Page> {
        let cdp_page = self.inner.new_page(url).await?;
        Page::attach(cdp_page, self.load).await
    }

    /// Let downloads land in `dir` without prompting
    pub async fn set_download_dir(&self, dir: &Path) -> SuiteResult<()> {
        std::fs::create_dir_all(dir)?;
        let absolute = std::fs::canonicalize(dir)?;
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(absolute.to_string_lossy().to_string())
            .build()
            .map_err(SuiteError::page)?;
        self.inner.execute(params).await?;
        tracing::debug!(dir = %absolute.display(), "download directory set");
        Ok(())
    }

    /// Target ids of every open tab or window
    pub async fn window_handles(&self) -> SuiteResult<Vec<String>> {
        let targets = self.inner.execute(GetTargetsParams::default()).await?;
        Ok(targets
            .target_infos
            .iter()
            .filter(|t| t.r#type == "page")
            .map(|t| t.target_id.inner().clone())
            .collect())
    }

    /// Attach to an existing tab by handle
    pub async fn page_for(&self, handle: &str) -> SuiteResult<Page> {
        let pages = self.inner.pages().await?;
        let cdp_page = pages
            .into_iter()
            .find(|p| p.target_id().inner() == handle)
            .ok_or_else(|| SuiteError::Window {
                message: format!("no window with handle {handle}"),
            })?;
        Page::attach(cdp_page, self.load).await
    }

    /// Close the browser
    pub async fn close(mut self) -> SuiteResult<()> {
        self.inner
            .close()
            .await
            .map_err(|e| SuiteError::BrowserLaunch {
                message: e.to_string(),
            })?;
        self.handle.abort();
        Ok(())
    }
}

// ============================================================================
// Page
// ============================================================================

#[derive(Debug, Deserialize)]
struct Lookup {
    found: bool,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ClickTarget {
    x: f64,
    y: f64,
    reachable: bool,
}

const JS_IS_DISPLAYED: &str = "const r = el.getBoundingClientRect(); \
    const s = el.ownerDocument.defaultView.getComputedStyle(el); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';";

const JS_DOCUMENT_RECT: &str = "const r = el.getBoundingClientRect(); \
    const w = el.ownerDocument.defaultView; \
    return { x: r.x + w.scrollX, y: r.y + w.scrollY, width: r.width, height: r.height };";

/// Centre of the element in top-level viewport coordinates, and whether a
/// pointer there would hit the element
const JS_CLICK_TARGET: &str = "const r = el.getBoundingClientRect(); \
    const cx = r.x + r.width / 2; const cy = r.y + r.height / 2; \
    const top = el.ownerDocument.elementFromPoint(cx, cy); \
    const reachable = !!top && (top === el || el.contains(top)); \
    let x = cx; let y = cy; let w = el.ownerDocument.defaultView; \
    while (w.frameElement) { const f = w.frameElement.getBoundingClientRect(); \
      x += f.x + w.frameElement.clientLeft; y += f.y + w.frameElement.clientTop; w = w.parent; } \
    return { x, y, reachable };";

/// Assign through the prototype's value setter so React sees the change
const JS_SET_VALUE: &str = "const d = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
    if (d && d.set) { d.set.call(el, __VALUE__); } else { el.value = __VALUE__; } \
    el.dispatchEvent(new Event('input', { bubbles: true })); \
    el.dispatchEvent(new Event('change', { bubbles: true })); return true;";

const JS_SELECT_TEXT: &str = "const opt = Array.from(el.options || []).find(o => o.text.trim() === __VALUE__); \
    if (!opt) { return false; } \
    const d = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
    if (d && d.set) { d.set.call(el, opt.value); } else { el.value = opt.value; } \
    el.dispatchEvent(new Event('change', { bubbles: true })); return true;";

fn with_value(template: &str, value: &str) -> String {
    template.replace("__VALUE__", &js_string(value))
}

fn exception_message(details: &ExceptionDetails) -> String {
    details
        .exception
        .as_ref()
        .and_then(|e| e.description.clone())
        .unwrap_or_else(|| details.text.clone())
}

/// JSON value of an evaluation, or the exception it threw
fn evaluation_value(returns: &EvaluateReturns) -> SuiteResult<serde_json::Value> {
    if let Some(ref details) = returns.exception_details {
        return Err(SuiteError::page(format!(
            "script threw: {}",
            exception_message(details)
        )));
    }
    Ok(returns
        .result
        .value
        .clone()
        .unwrap_or(serde_json::Value::Null))
}

/// One browser tab
#[derive(Debug, Clone)]
pub struct Page {
    inner: CdpPage,
    dialogs: DialogTracker,
    console: ConsoleLog,
    load: PageLoad,
}

impl Page {
    /// Wrap a CDP page and start tracking its JavaScript dialogs and console
    pub async fn attach(inner: CdpPage, load: PageLoad) -> SuiteResult<Self> {
        let dialogs = DialogTracker::new();
        let mut opening = inner
            .event_listener::<EventJavascriptDialogOpening>()
            .await?;
        let mut closed = inner.event_listener::<EventJavascriptDialogClosed>().await?;

        // Runtime and Log are enabled by chromiumoxide when it attaches
        let console = ConsoleLog::new();
        let mut calls = inner.event_listener::<EventConsoleApiCalled>().await?;
        let mut entries = inner.event_listener::<EventEntryAdded>().await?;

        let tracker = dialogs.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = opening.next() => {
                        tracker.opened(
                            Dialog::new(event.r#type.clone().into(), event.message.clone())
                                .with_default_value(event.default_prompt.clone()),
                        );
                    }
                    Some(event) = closed.next() => {
                        tracker.closed(event.result, Some(event.user_input.clone()));
                    }
                    else => break,
                }
            }
        });

        let log = console.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = calls.next() => {
                        log.record(ConsoleMessage::from_console_call(
                            &event.r#type,
                            &event.args,
                            *event.timestamp.inner(),
                        ));
                    }
                    Some(event) = entries.next() => {
                        log.record(ConsoleMessage::from_log_entry(&event.entry));
                    }
                    else => break,
                }
            }
        });

        Ok(Self {
            inner,
            dialogs,
            console,
            load,
        })
    }

    /// Window handle (CDP target id)
    #[must_use]
    pub fn target_id(&self) -> String {
        self.inner.target_id().inner().clone()
    }

    /// Dialog state of this tab
    #[must_use]
    pub const fn dialogs(&self) -> &DialogTracker {
        &self.dialogs
    }

    /// Console output of this tab
    #[must_use]
    pub const fn console(&self) -> &ConsoleLog {
        &self.console
    }

    /// Navigation strategy of this tab
    #[must_use]
    pub const fn load(&self) -> PageLoad {
        self.load
    }

    /// Navigate and wait for the load event, or only for `DOMContentLoaded`
    /// when the tab loads eagerly
    pub async fn goto(&self, url: &str) -> SuiteResult<()> {
        let failed = |message: String| SuiteError::Navigation {
            url: url.to_string(),
            message,
        };
        match self.load {
            PageLoad::Full => {
                self.inner.goto(url).await.map_err(|e| failed(e.to_string()))?;
            }
            PageLoad::Eager => {
                let returns = self
                    .inner
                    .execute(NavigateParams::new(url))
                    .await
                    .map_err(|e| failed(e.to_string()))?;
                if let Some(text) = returns.result.error_text.clone().filter(|t| !t.is_empty()) {
                    return Err(failed(text));
                }
                let options = WaitOptions::new()
                    .with_timeout(NAVIGATION_TIMEOUT_MS)
                    .with_message(format!("{url} did not reach DOMContentLoaded"));
                let page = self;
                wait_until(&options, || async move {
                    let state: String = page.evaluate("document.readyState").await?;
                    Ok(page.load.is_ready(&state))
                })
                .await?;
            }
        }
        tracing::debug!(url, load = ?self.load, "navigated");
        Ok(())
    }

    /// Current URL
    pub async fn url(&self) -> SuiteResult<Option<String>> {
        Ok(self.inner.url().await?)
    }

    /// Evaluate an expression and deserialize its value
    pub async fn evaluate<T: DeserializeOwned>(&self, expression: &str) -> SuiteResult<T> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(SuiteError::page)?;
        let returns = self.inner.execute(params).await?;
        let value = evaluation_value(&returns.result)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run `body` against the located element (bound to `el`), `None` if absent
    pub async fn try_eval_on<T: DeserializeOwned>(
        &self,
        locator: &Locator,
        body: &str,
    ) -> SuiteResult<Option<T>> {
        let lookup: Lookup = self.evaluate(&locator.script(body)).await?;
        if !lookup.found {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(lookup.value)?))
    }

    /// Run `body` against the located element, failing if it is absent
    pub async fn eval_on<T: DeserializeOwned>(&self, locator: &Locator, body: &str) -> SuiteResult<T> {
        self.try_eval_on(locator, body)
            .await?
            .ok_or_else(|| SuiteError::ElementNotFound {
                selector: locator.to_string(),
            })
    }

    // ------------------------------------------------------------------------
    // Element state
    // ------------------------------------------------------------------------

    /// Whether the element is in the DOM
    pub async fn element_exists(&self, locator: &Locator) -> SuiteResult<bool> {
        self.evaluate(&format!("{} !== null", locator.to_query()))
            .await
    }

    /// Whether the element is rendered with a non-empty box
    pub async fn is_displayed(&self, locator: &Locator) -> SuiteResult<bool> {
        Ok(self
            .try_eval_on(locator, JS_IS_DISPLAYED)
            .await?
            .unwrap_or(false))
    }

    /// Whether the element is not disabled
    pub async fn is_enabled(&self, locator: &Locator) -> SuiteResult<bool> {
        self.eval_on(locator, "return !el.disabled;").await
    }

    /// Whether a checkbox, radio or option is selected
    pub async fn is_selected(&self, locator: &Locator) -> SuiteResult<bool> {
        self.eval_on(locator, "return !!(el.checked || el.selected);")
            .await
    }

    /// Rendered text, trimmed
    pub async fn text(&self, locator: &Locator) -> SuiteResult<String> {
        self.eval_on(
            locator,
            "return (el.innerText !== undefined ? el.innerText : (el.textContent || '')).trim();",
        )
        .await
    }

    /// Form control value
    pub async fn value(&self, locator: &Locator) -> SuiteResult<String> {
        self.eval_on(
            locator,
            "return el.value === undefined || el.value === null ? '' : String(el.value);",
        )
        .await
    }

    /// Attribute value
    pub async fn attribute(&self, locator: &Locator, name: &str) -> SuiteResult<Option<String>> {
        self.eval_on(locator, &format!("return el.getAttribute({});", js_string(name)))
            .await
    }

    /// Computed CSS property
    pub async fn css_property(&self, locator: &Locator, name: &str) -> SuiteResult<String> {
        self.eval_on(
            locator,
            &format!(
                "return el.ownerDocument.defaultView.getComputedStyle(el).getPropertyValue({});",
                js_string(name)
            ),
        )
        .await
    }

    /// Document-relative location and size
    pub async fn rect(&self, locator: &Locator) -> SuiteResult<Rect> {
        self.eval_on(locator, JS_DOCUMENT_RECT).await
    }

    /// Number of matching elements
    pub async fn count(&self, locator: &Locator) -> SuiteResult<usize> {
        self.evaluate(&locator.to_count_query()).await
    }

    /// Text of every match
    pub async fn all_texts(&self, locator: &Locator) -> SuiteResult<Vec<String>> {
        self.evaluate(&format!(
            "{}.map(el => (el.innerText !== undefined ? el.innerText : (el.textContent || '')).trim())",
            locator.to_all_query()
        ))
        .await
    }

    /// An attribute of every match (empty string when missing)
    pub async fn all_attributes(&self, locator: &Locator, name: &str) -> SuiteResult<Vec<String>> {
        self.evaluate(&format!(
            "{}.map(el => el.getAttribute({}) || '')",
            locator.to_all_query(),
            js_string(name)
        ))
        .await
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    /// Scroll the element to the middle of the viewport
    pub async fn scroll_into_view(&self, locator: &Locator) -> SuiteResult<()> {
        self.eval_on::<bool>(
            locator,
            "el.scrollIntoView({ block: 'center', inline: 'center' }); return true;",
        )
        .await?;
        Ok(())
    }

    /// Scroll the window by an offset
    pub async fn scroll_by(&self, x: f64, y: f64) -> SuiteResult<()> {
        self.evaluate::<serde_json::Value>(&format!("window.scrollBy({x}, {y})"))
            .await?;
        Ok(())
    }

    /// Viewport centre of the element, scrolled into view
    pub async fn center(&self, locator: &Locator) -> SuiteResult<Point> {
        self.scroll_into_view(locator).await?;
        let target: ClickTarget = self.eval_on(locator, JS_CLICK_TARGET).await?;
        Ok(Point::new(target.x, target.y))
    }

    /// Click the element with a real mouse press/release at its centre.
    ///
    /// Falls back to a DOM click when another element covers the centre.
    pub async fn click(&self, locator: &Locator) -> SuiteResult<()> {
        self.scroll_into_view(locator).await?;
        let target: ClickTarget = self.eval_on(locator, JS_CLICK_TARGET).await?;
        if target.reachable {
            let at = Point::new(target.x, target.y);
            self.mouse_move(at, false).await?;
            self.mouse_button(DispatchMouseEventType::MousePressed, at).await?;
            self.mouse_button(DispatchMouseEventType::MouseReleased, at)
                .await?;
        } else {
            tracing::debug!(locator = %locator, "element covered, using DOM click");
            self.eval_on::<bool>(locator, "el.click(); return true;")
                .await?;
        }
        Ok(())
    }

    /// Click through the DOM from a timer so a dialog opened by the click
    /// cannot block this call
    pub async fn click_detached(&self, locator: &Locator) -> SuiteResult<()> {
        self.eval_on::<bool>(locator, "setTimeout(() => el.click(), 0); return true;")
            .await?;
        Ok(())
    }

    /// Move the pointer over the element
    pub async fn hover(&self, locator: &Locator) -> SuiteResult<()> {
        let at = self.center(locator).await?;
        self.mouse_move(at, false).await
    }

    /// Focus the element
    pub async fn focus(&self, locator: &Locator) -> SuiteResult<()> {
        self.eval_on::<bool>(locator, "el.focus(); return true;")
            .await?;
        Ok(())
    }

    /// Type into the focused element
    pub async fn insert_text(&self, text: &str) -> SuiteResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.inner.execute(InsertTextParams::new(text)).await?;
        Ok(())
    }

    /// Set a form control's value as if the user replaced it
    pub async fn set_value(&self, locator: &Locator, value: &str) -> SuiteResult<()> {
        self.eval_on::<bool>(locator, &with_value(JS_SET_VALUE, value))
            .await?;
        Ok(())
    }

    /// Empty a form control
    pub async fn clear_value(&self, locator: &Locator) -> SuiteResult<()> {
        self.set_value(locator, "").await
    }

    /// Choose the `<option>` whose text matches
    pub async fn select_by_visible_text(&self, locator: &Locator, text: &str) -> SuiteResult<()> {
        let selected: bool = self
            .eval_on(locator, &with_value(JS_SELECT_TEXT, text))
            .await?;
        if selected {
            Ok(())
        } else {
            Err(SuiteError::ElementNotFound {
                selector: format!("{locator} option '{text}'"),
            })
        }
    }

    /// Attach a file to an `<input type="file">`
    pub async fn upload_file(&self, locator: &Locator, file: &FileInput) -> SuiteResult<()> {
        let params = EvaluateParams::builder()
            .expression(locator.to_query())
            .return_by_value(false)
            .build()
            .map_err(SuiteError::page)?;
        let returns = self.inner.execute(params).await?;
        let object_id = returns
            .result
            .result
            .object_id
            .clone()
            .ok_or_else(|| SuiteError::ElementNotFound {
                selector: locator.to_string(),
            })?;
        let params = SetFileInputFilesParams::builder()
            .files(vec![file.path_string()])
            .object_id(object_id)
            .build()
            .map_err(SuiteError::page)?;
        self.inner.execute(params).await?;
        tracing::debug!(file = %file.name, locator = %locator, "file attached");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Keyboard and mouse
    // ------------------------------------------------------------------------

    /// Press and release a key with the given CDP modifier bits
    pub async fn press_key(&self, key: Key, modifiers: i64) -> SuiteResult<()> {
        let produces_text = key.text().is_some() && modifiers == 0;
        let down = if produces_text {
            DispatchKeyEventType::KeyDown
        } else {
            DispatchKeyEventType::RawKeyDown
        };
        self.key_event(down, key, modifiers, produces_text).await?;
        self.key_event(DispatchKeyEventType::KeyUp, key, modifiers, false)
            .await
    }

    /// Hold modifiers while pressing the remaining keys (e.g. Control+a)
    pub async fn press_chord(&self, keys: &[Key]) -> SuiteResult<()> {
        let mut modifiers = 0;
        let held: Vec<Key> = keys.iter().copied().filter(|k| k.is_modifier()).collect();
        for key in &held {
            modifiers |= modifier_bit(*key);
            self.key_event(DispatchKeyEventType::RawKeyDown, *key, modifiers, false)
                .await?;
        }
        for key in keys.iter().copied().filter(|k| !k.is_modifier()) {
            self.press_key(key, modifiers).await?;
        }
        for key in held.iter().rev() {
            modifiers &= !modifier_bit(*key);
            self.key_event(DispatchKeyEventType::KeyUp, *key, modifiers, false)
                .await?;
        }
        Ok(())
    }

    async fn key_event(
        &self,
        kind: DispatchKeyEventType,
        key: Key,
        modifiers: i64,
        with_text: bool,
    ) -> SuiteResult<()> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(key.key())
            .code(key.code())
            .windows_virtual_key_code(key.virtual_key_code())
            .native_virtual_key_code(key.virtual_key_code())
            .modifiers(modifiers);
        if with_text {
            if let Some(text) = key.text() {
                builder = builder.text(text.clone()).unmodified_text(text);
            }
        }
        let params = builder.build().map_err(SuiteError::page)?;
        self.inner.execute(params).await?;
        Ok(())
    }

    /// Move the pointer, optionally with the left button held
    pub async fn mouse_move(&self, at: Point, held: bool) -> SuiteResult<()> {
        let (button, buttons) = if held {
            (MouseButton::Left, 1)
        } else {
            (MouseButton::None, 0)
        };
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(at.x)
            .y(at.y)
            .button(button)
            .buttons(buttons)
            .build()
            .map_err(SuiteError::page)?;
        self.inner.execute(params).await?;
        Ok(())
    }

    async fn mouse_button(&self, kind: DispatchMouseEventType, at: Point) -> SuiteResult<()> {
        let buttons = i64::from(matches!(kind, DispatchMouseEventType::MousePressed));
        let params = DispatchMouseEventParams::builder()
            .r#type(kind)
            .x(at.x)
            .y(at.y)
            .button(MouseButton::Left)
            .buttons(buttons)
            .click_count(1)
            .build()
            .map_err(SuiteError::page)?;
        self.inner.execute(params).await?;
        Ok(())
    }

    /// Press at `from`, move to `to` in steps, release
    pub async fn drag(&self, from: Point, to: Point, steps: u32) -> SuiteResult<()> {
        self.mouse_move(from, false).await?;
        self.mouse_button(DispatchMouseEventType::MousePressed, from)
            .await?;
        for point in drag_path(from, to, steps) {
            self.mouse_move(point, true).await?;
            tokio::time::sleep(Duration::from_millis(DRAG_STEP_DELAY_MS)).await;
        }
        self.mouse_button(DispatchMouseEventType::MouseReleased, to)
            .await
    }

    /// Drag the element's centre to a viewport point
    pub async fn drag_to_point(&self, locator: &Locator, to: Point) -> SuiteResult<()> {
        let from = self.center(locator).await?;
        self.drag(from, to, DRAG_STEPS).await
    }

    // ------------------------------------------------------------------------
    // Dialogs, artifacts, window
    // ------------------------------------------------------------------------

    /// Resolve the open JavaScript dialog
    pub async fn resolve_dialog(&self, action: &DialogAction) -> SuiteResult<()> {
        let params = action.to_params().ok_or_else(|| SuiteError::Dialog {
            message: "a dialog cannot be resolved as pending".to_string(),
        })?;
        let accepted = params.accept;
        let text = params.prompt_text.clone();
        self.inner
            .execute(params)
            .await
            .map_err(|e| SuiteError::Dialog {
                message: e.to_string(),
            })?;
        self.dialogs.closed(accepted, text);
        Ok(())
    }

    /// Capture a PNG screenshot of the viewport
    pub async fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = self.inner.execute(params).await?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| SuiteError::page(format!("screenshot decode failed: {e}")))
    }

    /// Serialized DOM
    pub async fn content(&self) -> SuiteResult<String> {
        Ok(self.inner.content().await?)
    }

    /// Focus this tab
    pub async fn bring_to_front(&self) -> SuiteResult<()> {
        self.inner.bring_to_front().await?;
        Ok(())
    }

    /// Close this tab
    pub async fn close(self) -> SuiteResult<()> {
        self.inner.close().await?;
        Ok(())
    }
}

const fn modifier_bit(key: Key) -> i64 {
    match key {
        Key::Control => crate::input::MODIFIER_CONTROL,
        _ => 0,
    }
}
