//! Locator abstraction for element selection.
//!
//! Selector strings follow the shorthand the suites are written in:
//!
//! - `#id`, `.class`, `div > span` ... CSS
//! - `//div[@id='x']`, `(//li)[2]` ... XPath
//! - `h5=Elements` ... `<h5>` whose trimmed text equals `Elements`
//! - `h5*=Ele` ... `<h5>` whose text contains `Ele`
//! - `div.header=Age` ... the tag part may carry classes
//!
//! A [`Locator`] pairs a selector with the chain of iframes enclosing it and
//! an optional index. Resolution happens in the page through generated
//! JavaScript, so frames must be same-origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Element with exactly this trimmed text
    Text {
        /// Tag name to search
        tag: String,
        /// Expected text
        text: String,
    },
    /// Element whose text contains this fragment
    PartialText {
        /// Tag name to search
        tag: String,
        /// Text fragment
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create an exact text selector
    #[must_use]
    pub fn text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// Create a partial text selector
    #[must_use]
    pub fn partial_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::PartialText {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// Parse selector shorthand
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('/') || trimmed.starts_with("(/") || trimmed.starts_with("./") {
            return Self::XPath(trimmed.to_string());
        }
        if let Some((tag, text)) = split_text_selector(trimmed, "*=") {
            return Self::partial_text(tag, text);
        }
        if let Some((tag, text)) = split_text_selector(trimmed, "=") {
            return Self::text(tag, text);
        }
        Self::Css(trimmed.to_string())
    }

    /// JavaScript expression yielding an array of all matches inside `doc`
    #[must_use]
    pub fn to_all_query(&self, doc: &str) -> String {
        match self {
            Self::Css(s) => format!("Array.from({doc}.querySelectorAll({}))", js_string(s)),
            Self::XPath(s) => format!(
                "((d) => {{ const r = d.evaluate({}, d, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})({doc})",
                js_string(s)
            ),
            Self::Text { tag, text } => format!(
                "Array.from({doc}.querySelectorAll({})).filter(el => (el.textContent || '').trim() === {})",
                js_string(tag),
                js_string(text)
            ),
            Self::PartialText { tag, text } => format!(
                "Array.from({doc}.querySelectorAll({})).filter(el => (el.textContent || '').includes({}))",
                js_string(tag),
                js_string(text)
            ),
        }
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) | Self::XPath(s) => f.write_str(s),
            Self::Text { tag, text } => write!(f, "{tag}={text}"),
            Self::PartialText { tag, text } => write!(f, "{tag}*={text}"),
        }
    }
}

/// `tag=text` / `tag*=text`, where the tag is an element name with optional classes
fn split_text_selector<'a>(input: &'a str, op: &str) -> Option<(&'a str, &'a str)> {
    let idx = input.find(op)?;
    let tag = &input[..idx];
    let text = &input[idx + op.len()..];
    let bare = !tag.is_empty()
        && tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_');
    if op == "=" && tag.ends_with('*') {
        return None;
    }
    bare.then_some((tag, text))
}

/// Encode a Rust string as a JavaScript string literal
#[must_use]
pub fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// A selector plus where to look for it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    frames: Vec<Selector>,
    index: Option<usize>,
}

impl Locator {
    /// Create a locator in the top-level document
    #[must_use]
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            frames: Vec::new(),
            index: None,
        }
    }

    /// Create a locator from selector shorthand
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::new(Selector::parse(input))
    }

    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Selector::css(selector))
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Selector::xpath(selector))
    }

    /// Select the nth match (zero-based) instead of the first
    #[must_use]
    pub fn nth(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Resolve inside the given chain of iframes, outermost first.
    ///
    /// A locator already scoped to that chain is returned unchanged.
    #[must_use]
    pub fn within_frames(mut self, frames: &[Selector]) -> Self {
        if self.frames.starts_with(frames) {
            return self;
        }
        let mut chain = frames.to_vec();
        chain.append(&mut self.frames);
        self.frames = chain;
        self
    }

    /// The element selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Enclosing frames, outermost first
    #[must_use]
    pub fn frames(&self) -> &[Selector] {
        &self.frames
    }

    /// Match index, if any
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    /// Expression yielding the document the selector is evaluated in, or null
    fn document_query(&self) -> String {
        let mut js = String::from("(() => { let doc = document; ");
        for frame in &self.frames {
            js.push_str(&format!(
                "{{ const f = {}[0]; if (!f || !f.contentDocument) {{ return null; }} doc = f.contentDocument; }} ",
                frame.to_all_query("doc")
            ));
        }
        js.push_str("return doc; })()");
        js
    }

    /// Expression yielding an array of all matching elements
    #[must_use]
    pub fn to_all_query(&self) -> String {
        format!(
            "((doc) => doc ? {} : [])({})",
            self.selector.to_all_query("doc"),
            self.document_query()
        )
    }

    /// Expression yielding the selected element or null
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "({}[{}] || null)",
            self.to_all_query(),
            self.index.unwrap_or(0)
        )
    }

    /// Expression yielding the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_all_query())
    }

    /// Wrap a function body operating on `el` into an expression returning
    /// `{ found, value }`
    #[must_use]
    pub fn script(&self, body: &str) -> String {
        format!(
            "(() => {{ const el = {}; if (!el) {{ return {{ found: false, value: null }}; }} \
             const value = (() => {{ {body} }})(); \
             return {{ found: true, value: value === undefined ? null : value }}; }})()",
            self.to_query()
        )
    }
}

impl From<&str> for Locator {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Locator {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "{frame} >> ")?;
        }
        write!(f, "{}", self.selector)?;
        if let Some(i) = self.index {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_parse_css() {
            assert_eq!(Selector::parse("#userName"), Selector::css("#userName"));
            assert_eq!(
                Selector::parse("input[type=\"file\"]"),
                Selector::css("input[type=\"file\"]")
            );
            assert_eq!(
                Selector::parse("a[href*='sample']"),
                Selector::css("a[href*='sample']")
            );
        }

        #[test]
        fn test_parse_xpath() {
            assert_eq!(
                Selector::parse("//div[@id='app']"),
                Selector::xpath("//div[@id='app']")
            );
            assert_eq!(Selector::parse("(//li)[2]"), Selector::xpath("(//li)[2]"));
        }

        #[test]
        fn test_parse_text() {
            assert_eq!(
                Selector::parse("h5=Elements"),
                Selector::text("h5", "Elements")
            );
            assert_eq!(
                Selector::parse("span=Text Box"),
                Selector::text("span", "Text Box")
            );
        }

        #[test]
        fn test_parse_text_with_class() {
            assert_eq!(
                Selector::parse("div.rt-resizable-header-content=First Name"),
                Selector::text("div.rt-resizable-header-content", "First Name")
            );
        }

        #[test]
        fn test_parse_partial_text() {
            assert_eq!(
                Selector::parse("h5*=Ele"),
                Selector::partial_text("h5", "Ele")
            );
        }

        #[test]
        fn test_display_round_trips_shorthand() {
            for s in ["#a", "//div", "h5=Forms", "span*=Book"] {
                assert_eq!(Selector::parse(s).to_string(), s);
            }
        }

        #[test]
        fn test_css_query() {
            let q = Selector::css("#submit").to_all_query("document");
            assert_eq!(q, "Array.from(document.querySelectorAll(\"#submit\"))");
        }

        #[test]
        fn test_text_query_escapes_quotes() {
            let q = Selector::text("div", "say \"hi\"").to_all_query("doc");
            assert!(q.contains("\"say \\\"hi\\\"\""));
            assert!(q.contains(".trim() ==="));
        }

        #[test]
        fn test_xpath_query_uses_snapshot() {
            let q = Selector::xpath("//li").to_all_query("doc");
            assert!(q.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
            assert!(q.ends_with("(doc)"));
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_default_index_is_first() {
            let q = Locator::css("li").to_query();
            assert!(q.ends_with("[0] || null)"));
        }

        #[test]
        fn test_nth() {
            let loc = Locator::css("li").nth(3);
            assert_eq!(loc.index(), Some(3));
            assert!(loc.to_query().ends_with("[3] || null)"));
            assert_eq!(loc.to_string(), "li[3]");
        }

        #[test]
        fn test_frames_resolve_content_document() {
            let loc = Locator::css("#sampleHeading").within_frames(&[Selector::css("#frame1")]);
            let q = loc.to_query();
            assert!(q.contains("contentDocument"));
            assert!(q.contains("\"#frame1\""));
            assert_eq!(loc.to_string(), "#frame1 >> #sampleHeading");
        }

        #[test]
        fn test_nested_frames_keep_order() {
            let loc = Locator::css("p").within_frames(&[
                Selector::css("#frame1"),
                Selector::css("iframe"),
            ]);
            let q = loc.to_query();
            let outer = q.find("#frame1").unwrap();
            let inner = q.find("\"iframe\"").unwrap();
            assert!(outer < inner);
        }

        #[test]
        fn test_scoping_twice_is_a_noop() {
            let frames = [Selector::css("#frame1")];
            let once = Locator::css("#sampleHeading").within_frames(&frames);
            let twice = once.clone().within_frames(&frames);
            assert_eq!(once, twice);
            assert_eq!(twice.frames().len(), 1);
        }

        #[test]
        fn test_count_query() {
            assert!(Locator::css(".rt-tr-group")
                .to_count_query()
                .ends_with(".length"));
        }

        #[test]
        fn test_script_wraps_body() {
            let s = Locator::css("#a").script("return el.textContent;");
            assert!(s.contains("found: false"));
            assert!(s.contains("return el.textContent;"));
        }

        #[test]
        fn test_from_str() {
            let loc: Locator = "h5=Forms".into();
            assert_eq!(loc.selector(), &Selector::text("h5", "Forms"));
            assert!(loc.frames().is_empty());
        }
    }
}
