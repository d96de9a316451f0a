//! Highlight styling: an ordered CSS property map rendered either as inline
//! declarations or as an injected stylesheet rule.
//!
//! Order matters for CSS (later declarations win), so the map is kept as the
//! declaration list the configuration wrote, not re-sorted by key.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Default highlight: yellow marker, black text
pub const DEFAULT_PROPERTIES: [(&str, &str); 2] =
    [("background-color", "yellow"), ("color", "black")];

/// An ordered mapping of CSS property names to values.
///
/// Immutable after configuration load; shared read-only by all highlight
/// operations during a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    properties: Vec<(String, String)>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            properties: DEFAULT_PROPERTIES
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl HighlightStyle {
    /// Create an empty style
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// Append a declaration, keeping insertion order
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((property.into(), value.into()));
        self
    }

    /// The declarations in configuration order
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// True when no declarations are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render as inline declarations: `background-color: yellow; color: black;`
    ///
    /// This string is passed to page scripts as an argument, never
    /// concatenated into script source.
    #[must_use]
    pub fn declarations(&self) -> String {
        let mut out = String::new();
        for (property, value) in &self.properties {
            out.push_str(property);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("; ");
        }
        out.trim_end().to_string()
    }

    /// Render as a stylesheet rule for the given class name
    #[must_use]
    pub fn rule(&self, class_name: &str) -> String {
        format!(".{class_name} {{ {} }}", self.declarations())
    }
}

impl<'de> Deserialize<'de> for HighlightStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StyleVisitor;

        impl<'de> Visitor<'de> for StyleVisitor {
            type Value = HighlightStyle;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of CSS property names to values")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut properties = Vec::with_capacity(access.size_hint().unwrap_or(2));
                while let Some((property, value)) = access.next_entry::<String, String>()? {
                    properties.push((property, value));
                }
                Ok(HighlightStyle { properties })
            }
        }

        deserializer.deserialize_map(StyleVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_yellow_on_black_text() {
        let style = HighlightStyle::default();
        assert_eq!(
            style.declarations(),
            "background-color: yellow; color: black;"
        );
    }

    #[test]
    fn test_declarations_preserve_insertion_order() {
        let style = HighlightStyle::empty()
            .with("outline", "2px solid red")
            .with("background-color", "pink");
        assert_eq!(
            style.declarations(),
            "outline: 2px solid red; background-color: pink;"
        );
    }

    #[test]
    fn test_empty_style_renders_empty() {
        assert_eq!(HighlightStyle::empty().declarations(), "");
        assert!(HighlightStyle::empty().is_empty());
    }

    #[test]
    fn test_rule_wraps_class_name() {
        let style = HighlightStyle::default();
        assert_eq!(
            style.rule("resaltar-highlight"),
            ".resaltar-highlight { background-color: yellow; color: black; }"
        );
    }

    #[test]
    fn test_deserializes_from_json_object() {
        let style: HighlightStyle =
            serde_json::from_str(r#"{"background-color": "yellow", "color": "black"}"#).unwrap();
        assert_eq!(style.properties().len(), 2);
        assert_eq!(style.properties()[0].0, "background-color");
    }
}
