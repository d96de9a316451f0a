//! Page scripts executed in the controlled browser.
//!
//! Every script is a self-contained JavaScript function declaration; the
//! values it operates on (locators, style text, search text) travel as an
//! argument vector, never as text spliced into the source. Drivers either
//! pass the vector through their script host natively or apply it with
//! [`PageScript::to_expression`].
//!
//! Element lookup follows the locator kind tag: `querySelector` for CSS,
//! `document.evaluate(..., FIRST_ORDERED_NODE_TYPE, ...)` for XPath.

use crate::selector::Locator;
use serde_json::Value;

/// Probe for DOM scripting capability. Highlighting never runs before this
/// returns `true`.
pub const PROBE_DOM: &str = "function() {\
 return !!(window.document && document.querySelector && document.evaluate);\
 }";

/// Overwrite the inline `style` attribute of the first matching element.
///
/// Returns `null` when nothing matched, otherwise `{prev: <string|null>}`
/// with the attribute value captured *before* mutation.
pub const HIGHLIGHT_ELEMENT_STYLE: &str = "function(kind, value, css) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return null; }\
 var prev = el.getAttribute('style');\
 el.setAttribute('style', css);\
 return { prev: prev };\
 }";

/// Restore the inline `style` attribute captured by
/// [`HIGHLIGHT_ELEMENT_STYLE`]. A `null` previous value removes the
/// attribute entirely, so the element ends byte-identical to its
/// pre-highlight state.
pub const RESTORE_ELEMENT_STYLE: &str = "function(kind, value, prev) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return false; }\
 if (prev === null) { el.removeAttribute('style'); }\
 else { el.setAttribute('style', prev); }\
 return true;\
 }";

/// Append the highlight class to the first matching element, capturing the
/// original `class` attribute first. Same contract as
/// [`HIGHLIGHT_ELEMENT_STYLE`].
pub const HIGHLIGHT_ELEMENT_CLASS: &str = "function(kind, value, className) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return null; }\
 var prev = el.getAttribute('class');\
 el.setAttribute('class', prev ? prev + ' ' + className : className);\
 return { prev: prev };\
 }";

/// Restore the `class` attribute captured by [`HIGHLIGHT_ELEMENT_CLASS`].
pub const RESTORE_ELEMENT_CLASS: &str = "function(kind, value, prev) {\
 var find = function(kind, value) {\
 if (kind === 'xpath') {\
 return document.evaluate(value, document, null,\
 XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue;\
 }\
 return document.querySelector(value);\
 };\
 var el = find(kind, value);\
 if (!el) { return false; }\
 if (prev === null) { el.removeAttribute('class'); }\
 else { el.setAttribute('class', prev); }\
 return true;\
 }";

/// Inject a stylesheet rule once per document. Keyed by element id, so the
/// injection is idempotent: returns `true` on first injection, `false` when
/// the sheet already exists.
pub const ENSURE_STYLESHEET: &str = "function(sheetId, ruleText) {\
 if (document.getElementById(sheetId)) { return false; }\
 var sheet = document.createElement('style');\
 sheet.id = sheetId;\
 sheet.appendChild(document.createTextNode(ruleText));\
 document.head.appendChild(sheet);\
 return true;\
 }";

/// Install the text-marking helpers on `window` once per document.
///
/// `__resaltarMark(text, className)` walks text nodes under `body`, wraps
/// each case-sensitive substring occurrence in a marker `<span>` carrying
/// `className`, and returns the number of wrapped occurrences. Script and
/// style subtrees and already-marked spans are skipped.
/// `__resaltarUnmark(className)` unwraps every marker span and re-normalizes
/// the surrounding text nodes, returning the number of spans removed.
///
/// Returns `true` on first installation, `false` when already present.
pub const ENSURE_MARK_LIBRARY: &str = "function() {\
 if (window.__resaltarMark) { return false; }\
 var markNode = function(node, text, className) {\
 if (node.nodeType === 3) {\
 var at = node.data.indexOf(text);\
 if (at < 0) { return 0; }\
 var span = document.createElement('span');\
 span.className = className;\
 var middle = node.splitText(at);\
 middle.splitText(text.length);\
 span.appendChild(middle.cloneNode(true));\
 middle.parentNode.replaceChild(span, middle);\
 return 1;\
 }\
 if (node.nodeType !== 1 || !node.childNodes) { return 0; }\
 if (/(script|style)/i.test(node.tagName)) { return 0; }\
 if (node.className === className) { return 0; }\
 var total = 0;\
 for (var i = 0; i < node.childNodes.length; i += 1) {\
 var wrapped = markNode(node.childNodes[i], text, className);\
 total += wrapped;\
 i += wrapped;\
 }\
 return total;\
 };\
 window.__resaltarMark = function(text, className) {\
 if (!text || !document.body) { return 0; }\
 return markNode(document.body, text, className);\
 };\
 window.__resaltarUnmark = function(className) {\
 var spans = document.querySelectorAll('span.' + className);\
 for (var i = 0; i < spans.length; i += 1) {\
 var span = spans[i];\
 var parent = span.parentNode;\
 while (span.firstChild) { parent.insertBefore(span.firstChild, span); }\
 parent.removeChild(span);\
 parent.normalize();\
 }\
 return spans.length;\
 };\
 return true;\
 }";

/// Wrap occurrences of `text` with the marker class. Requires
/// [`ENSURE_MARK_LIBRARY`] to have run; returns the occurrence count.
pub const MARK_TEXT: &str = "function(text, className) {\
 return window.__resaltarMark ? window.__resaltarMark(text, className) : 0;\
 }";

/// Remove every marker span with the given class and restore the original
/// text nodes.
pub const UNMARK_TEXT: &str = "function(className) {\
 return window.__resaltarUnmark ? window.__resaltarUnmark(className) : 0;\
 }";

/// A script function plus the argument vector it is applied to.
#[derive(Debug, Clone)]
pub struct PageScript {
    /// JavaScript function declaration
    pub code: &'static str,
    /// Arguments applied to the function, in order
    pub args: Vec<Value>,
}

impl PageScript {
    /// Create a script with no arguments
    #[must_use]
    pub const fn new(code: &'static str) -> Self {
        Self {
            code,
            args: Vec::new(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Render as a single self-applying expression for script hosts that
    /// take one expression string. The argument vector is serialized as a
    /// JSON array, keeping data out of the function source.
    #[must_use]
    pub fn to_expression(&self) -> String {
        let args = serde_json::to_string(&self.args).unwrap_or_else(|_| "[]".to_string());
        format!("({}).apply(null, {args})", self.code)
    }

    /// DOM scripting capability probe
    #[must_use]
    pub fn probe_dom() -> Self {
        Self::new(PROBE_DOM)
    }

    /// Inline-style element highlight
    #[must_use]
    pub fn highlight_element_style(locator: &Locator, declarations: &str) -> Self {
        Self::new(HIGHLIGHT_ELEMENT_STYLE)
            .arg(locator.kind.as_str())
            .arg(locator.value.as_str())
            .arg(declarations)
    }

    /// Restore the inline `style` attribute to its captured value
    #[must_use]
    pub fn restore_element_style(locator: &Locator, prev: Option<&str>) -> Self {
        Self::new(RESTORE_ELEMENT_STYLE)
            .arg(locator.kind.as_str())
            .arg(locator.value.as_str())
            .arg(prev.map_or(Value::Null, |p| Value::String(p.to_string())))
    }

    /// Class-based element highlight
    #[must_use]
    pub fn highlight_element_class(locator: &Locator, class_name: &str) -> Self {
        Self::new(HIGHLIGHT_ELEMENT_CLASS)
            .arg(locator.kind.as_str())
            .arg(locator.value.as_str())
            .arg(class_name)
    }

    /// Restore the `class` attribute to its captured value
    #[must_use]
    pub fn restore_element_class(locator: &Locator, prev: Option<&str>) -> Self {
        Self::new(RESTORE_ELEMENT_CLASS)
            .arg(locator.kind.as_str())
            .arg(locator.value.as_str())
            .arg(prev.map_or(Value::Null, |p| Value::String(p.to_string())))
    }

    /// Idempotent stylesheet injection for the highlight class
    #[must_use]
    pub fn ensure_stylesheet(class_name: &str, rule: &str) -> Self {
        Self::new(ENSURE_STYLESHEET)
            .arg(format!("resaltar-style-{class_name}"))
            .arg(rule)
    }

    /// Idempotent installation of the text-marking helpers
    #[must_use]
    pub fn ensure_mark_library() -> Self {
        Self::new(ENSURE_MARK_LIBRARY)
    }

    /// Wrap text occurrences with the marker class
    #[must_use]
    pub fn mark_text(text: &str, class_name: &str) -> Self {
        Self::new(MARK_TEXT).arg(text).arg(class_name)
    }

    /// Unwrap marker spans and restore original text nodes
    #[must_use]
    pub fn unmark_text(class_name: &str) -> Self {
        Self::new(UNMARK_TEXT).arg(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Locator;

    #[test]
    fn test_highlight_element_args_carry_locator_and_css() {
        let script = PageScript::highlight_element_style(
            &Locator::css(".submit-btn"),
            "background-color: yellow;",
        );
        assert_eq!(script.args[0], "css");
        assert_eq!(script.args[1], ".submit-btn");
        assert_eq!(script.args[2], "background-color: yellow;");
    }

    #[test]
    fn test_locator_text_never_lands_in_source() {
        // The whole point of parameterized execution: a hostile selector
        // stays data
        let script = PageScript::highlight_element_style(
            &Locator::css("\"); alert(1); (\""),
            "color: red;",
        );
        assert!(!script.code.contains("alert"));
        assert_eq!(script.args[1], "\"); alert(1); (\"");
    }

    #[test]
    fn test_to_expression_applies_json_args() {
        let expr = PageScript::mark_text("Forgot", "resaltar-highlight").to_expression();
        assert!(expr.starts_with('('));
        assert!(expr.contains(".apply(null, [\"Forgot\",\"resaltar-highlight\"])"));
    }

    #[test]
    fn test_restore_with_no_previous_value_passes_null() {
        let script = PageScript::restore_element_style(&Locator::css("#x"), None);
        assert_eq!(script.args[2], serde_json::Value::Null);
    }

    #[test]
    fn test_stylesheet_id_is_derived_from_class() {
        let script = PageScript::ensure_stylesheet("hl", ".hl { color: black; }");
        assert_eq!(script.args[0], "resaltar-style-hl");
    }

    #[test]
    fn test_xpath_kind_reaches_script_args() {
        let script = PageScript::highlight_element_class(
            &Locator::xpath("//input[@type='submit']"),
            "resaltar-highlight",
        );
        assert_eq!(script.args[0], "xpath");
    }

    #[test]
    fn test_scripts_are_function_declarations() {
        for code in [
            PROBE_DOM,
            HIGHLIGHT_ELEMENT_STYLE,
            RESTORE_ELEMENT_STYLE,
            HIGHLIGHT_ELEMENT_CLASS,
            RESTORE_ELEMENT_CLASS,
            ENSURE_STYLESHEET,
            ENSURE_MARK_LIBRARY,
            MARK_TEXT,
            UNMARK_TEXT,
        ] {
            assert!(code.starts_with("function"), "not a function: {code}");
        }
    }
}
