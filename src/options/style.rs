//! Style descriptions passed through to rendered elements.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A mapping of CSS property names to values, kept in insertion order.
///
/// Keys may be written in camelCase (`maxWidth`) or kebab-case
/// (`max-width`); they are normalized when rendered to an inline
/// `style` attribute. Re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap(Vec<(String, String)>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style map with a single `width` declaration.
    pub fn width(width: impl Into<String>) -> Self {
        Self::new().with("width", width)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `self` over `base`: keys present in both take the value from
    /// `self` and keep their position in `base`; new keys follow.
    pub fn merged_over(&self, base: &StyleMap) -> StyleMap {
        let mut merged = base.clone();
        for (key, value) in self.iter() {
            merged.insert(key, value);
        }
        merged
    }

    /// Render as an inline style attribute value, e.g. `width: 400px; height: 200px`.
    ///
    /// Returns `None` for an empty map so the attribute can be omitted.
    pub fn to_css(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let declarations: Vec<String> = self
            .0
            .iter()
            .map(|(key, value)| format!("{}: {}", css_property_name(key), value))
            .collect();

        Some(declarations.join("; "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Self::new();
        for (key, value) in iter {
            style.insert(key, value);
        }
        style
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StyleMapVisitor;

        impl<'de> Visitor<'de> for StyleMapVisitor {
            type Value = StyleMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of CSS property names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<StyleMap, A::Error> {
                let mut style = StyleMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    style.insert(key, value);
                }
                Ok(style)
            }
        }

        deserializer.deserialize_map(StyleMapVisitor)
    }
}

impl JsonSchema for StyleMap {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "StyleMap".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <BTreeMap<String, String>>::json_schema(gen)
    }
}

/// Convert a camelCase property to kebab-case. Custom properties and names
/// that already contain a dash are kept as written.
fn css_property_name(key: &str) -> String {
    if key.starts_with("--") || key.contains('-') {
        return key.to_string();
    }

    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_both_keys() {
        let base = StyleMap::width("400px");
        let caller = StyleMap::new().with("height", "200px");

        let merged = caller.merged_over(&base);
        assert_eq!(merged.get("width"), Some("400px"));
        assert_eq!(merged.get("height"), Some("200px"));
    }

    #[test]
    fn test_merge_caller_wins_on_collision() {
        let base = StyleMap::width("400px");
        let caller = StyleMap::width("600px");

        assert_eq!(caller.merged_over(&base).get("width"), Some("600px"));
    }

    #[test]
    fn test_css_rendering() {
        let style: StyleMap = [("maxWidth", "90vw"), ("--md-dialog-container-color", "red")]
            .into_iter()
            .collect();

        assert_eq!(
            style.to_css().unwrap(),
            "max-width: 90vw; --md-dialog-container-color: red"
        );
        assert_eq!(StyleMap::new().to_css(), None);
    }

    #[test]
    fn test_merge_keeps_base_order() {
        let base = StyleMap::width("400px");
        let caller = StyleMap::new().with("height", "200px").with("width", "600px");

        assert_eq!(
            caller.merged_over(&base).to_css().unwrap(),
            "width: 600px; height: 200px"
        );
    }

    #[test]
    fn test_json_keeps_document_order() {
        let style: StyleMap =
            serde_json::from_str(r#"{ "zIndex": "3", "color": "red", "zIndex": "4" }"#).unwrap();

        assert_eq!(style.to_css().unwrap(), "z-index: 4; color: red");
        assert_eq!(
            serde_json::to_string(&style).unwrap(),
            r#"{"zIndex":"4","color":"red"}"#
        );
    }
}
