//! Selector resolution: heterogeneous locator input to a kind-tagged locator.
//!
//! Host acceptance-test frameworks hand locators around in two shapes: a raw
//! string (`".login-form"`, `"//a[contains(text(), 'Forgot')]"`) or a mapping
//! with exactly one strict key (`{css: ...}`, `{class: ...}`, `{id: ...}`,
//! `{xpath: ...}`). Resolution maps either shape to one canonical
//! [`Locator`] - or to nothing, in which case the caller skips highlighting
//! without failing the wrapped call.
//!
//! Resolution is a pure function of the input: no page access, no state.

use serde::Deserialize;

/// Kind tag for a resolved locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    /// CSS selector (e.g. `button.primary`)
    Css,
    /// XPath expression (e.g. `//input[@type='submit']`)
    XPath,
}

impl LocatorKind {
    /// Wire name of this kind, passed to page scripts as an argument
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
        }
    }
}

impl std::fmt::Display for LocatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, kind-tagged reference to a page element.
///
/// Constructed per call by [`SelectorInput::resolve`], handed to the page as
/// script arguments, and discarded. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// Whether `value` is a CSS selector or an XPath expression
    pub kind: LocatorKind,
    /// The locator string itself
    pub value: String,
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            kind: LocatorKind::Css,
            value: value.into(),
        }
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            kind: LocatorKind::XPath,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.value)
    }
}

/// Strict locator fields as hosts serialize them.
///
/// More than one field may be populated; resolution picks the first present
/// in the fixed priority order `css > class > id > xpath`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SelectorFields {
    /// Verbatim CSS selector
    #[serde(default)]
    pub css: Option<String>,
    /// Class name, resolved as `.{class}`
    #[serde(default)]
    pub class: Option<String>,
    /// Element id, resolved as `#{id}`
    #[serde(default)]
    pub id: Option<String>,
    /// Verbatim XPath expression
    #[serde(default)]
    pub xpath: Option<String>,
}

/// Heterogeneous locator input: a raw string or a strict-field mapping.
///
/// Deserializes untagged, so host-framework JSON like `".submit-btn"` or
/// `{"css": ".submit-btn"}` both work directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SelectorInput {
    /// Raw locator string; CSS vs XPath is decided syntactically
    Raw(String),
    /// Strict mapping with `css`/`class`/`id`/`xpath` keys
    Fields(SelectorFields),
}

impl SelectorInput {
    /// Shorthand for `{css: ...}`
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::Fields(SelectorFields {
            css: Some(value.into()),
            ..SelectorFields::default()
        })
    }

    /// Shorthand for `{class: ...}`
    #[must_use]
    pub fn class(value: impl Into<String>) -> Self {
        Self::Fields(SelectorFields {
            class: Some(value.into()),
            ..SelectorFields::default()
        })
    }

    /// Shorthand for `{id: ...}`
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::Fields(SelectorFields {
            id: Some(value.into()),
            ..SelectorFields::default()
        })
    }

    /// Shorthand for `{xpath: ...}`
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::Fields(SelectorFields {
            xpath: Some(value.into()),
            ..SelectorFields::default()
        })
    }

    /// Resolve this input to a kind-tagged locator.
    ///
    /// Returns `None` for empty, blank, or unrecognized input. Callers must
    /// treat `None` as "skip highlighting, do not fail the underlying call".
    #[must_use]
    pub fn resolve(&self) -> Option<Locator> {
        match self {
            Self::Raw(raw) => resolve_raw(raw),
            Self::Fields(fields) => resolve_fields(fields),
        }
    }
}

impl From<&str> for SelectorInput {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for SelectorInput {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn resolve_fields(fields: &SelectorFields) -> Option<Locator> {
    // Fixed priority order: css > class > id > xpath
    if let Some(css) = present(&fields.css) {
        return Some(Locator::css(css));
    }
    if let Some(class) = present(&fields.class) {
        return Some(Locator::css(format!(".{class}")));
    }
    if let Some(id) = present(&fields.id) {
        return Some(Locator::css(format!("#{id}")));
    }
    if let Some(xpath) = present(&fields.xpath) {
        return Some(Locator::xpath(xpath));
    }
    None
}

fn resolve_raw(raw: &str) -> Option<Locator> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_xpath(trimmed) {
        Some(Locator::xpath(trimmed))
    } else {
        Some(Locator::css(trimmed))
    }
}

/// Syntactic predicate: does a raw locator string look like XPath?
///
/// A string beginning with `/` (covers `//`), a relative `./` step, or a
/// parenthesized path expression like `(//a)[1]` is XPath. Everything else
/// is treated as CSS.
#[must_use]
pub fn is_xpath(raw: &str) -> bool {
    let s = raw.trim();
    if s.starts_with('/') || s.starts_with("./") {
        return true;
    }
    s.starts_with('(') && s.trim_start_matches('(').starts_with('/')
}
