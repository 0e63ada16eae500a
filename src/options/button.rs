//! Button options and their normalization into [`ButtonSpec`].
//!
//! Callers may describe a button loosely (a label, a partial spec, a bare
//! callback or a pre-built markup fragment). [`normalize`] is the single
//! place where that leniency is resolved; everything downstream works with
//! [`NormalizedButton`].

use crate::document::DialogElement;
use crate::markup::Template;
use super::StyleMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Label used when neither the caller nor the slot supplies one.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// Visual category of a button. Each variant is its own component tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ButtonVariant {
    #[default]
    Text,
    Filled,
    FilledTonal,
    Elevated,
}

impl ButtonVariant {
    pub const ALL: [ButtonVariant; 4] = [
        ButtonVariant::Text,
        ButtonVariant::Filled,
        ButtonVariant::FilledTonal,
        ButtonVariant::Elevated,
    ];

    /// Component tag rendered for this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Text => "md-text-button",
            Self::Filled => "md-filled-button",
            Self::FilledTonal => "md-filled-tonal-button",
            Self::Elevated => "md-elevated-button",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Filled => "filled",
            Self::FilledTonal => "filled-tonal",
            Self::Elevated => "elevated",
        }
    }

    /// Parse a variant name or tag. Unknown values fall back to [`ButtonVariant::Text`].
    pub fn parse_lenient(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("md-")
            .unwrap_or(&normalized)
            .trim_end_matches("-button");

        match name {
            "text" => Self::Text,
            "filled" => Self::Filled,
            "filled-tonal" | "filled_tonal" | "tonal" => Self::FilledTonal,
            "elevated" => Self::Elevated,
            _ => {
                debug!("Unknown button variant '{}', using text button", value);
                Self::Text
            }
        }
    }
}

impl From<&str> for ButtonVariant {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl From<String> for ButtonVariant {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<ButtonVariant> for String {
    fn from(variant: ButtonVariant) -> Self {
        variant.name().to_string()
    }
}

impl fmt::Display for ButtonVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Click behavior of a button. Receives the live dialog element.
#[derive(Clone)]
pub struct ButtonCallback(Arc<dyn Fn(&DialogElement) + Send + Sync>);

impl ButtonCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DialogElement) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Default behavior: close the dialog.
    pub fn close_dialog() -> Self {
        Self::new(|dialog| dialog.close())
    }

    pub fn invoke(&self, dialog: &DialogElement) {
        (self.0)(dialog)
    }
}

impl fmt::Debug for ButtonCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ButtonCallback(..)")
    }
}

/// Canonical description of one action button.
#[derive(Debug, Clone)]
pub struct ButtonSpec {
    pub label: String,
    pub variant: ButtonVariant,
    /// Overriding the callback replaces the default close; the callback must
    /// close the dialog itself if that is wanted.
    pub callback: ButtonCallback,
    pub style: Option<StyleMap>,
}

impl Default for ButtonSpec {
    fn default() -> Self {
        Self {
            label: UNDEFINED_LABEL.to_string(),
            variant: ButtonVariant::default(),
            callback: ButtonCallback::close_dialog(),
            style: None,
        }
    }
}

/// Partial button description; unset fields take their defaults.
#[derive(Debug, Clone, Default)]
pub struct PartialButtonSpec {
    pub label: Option<String>,
    pub variant: Option<ButtonVariant>,
    pub callback: Option<ButtonCallback>,
    pub style: Option<StyleMap>,
}

impl PartialButtonSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn variant(mut self, variant: impl Into<ButtonVariant>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&DialogElement) + Send + Sync + 'static,
    {
        self.callback = Some(ButtonCallback::new(f));
        self
    }

    pub fn style(mut self, style: StyleMap) -> Self {
        self.style = Some(style);
        self
    }
}

/// Any of the shapes a caller may supply for a button slot.
#[derive(Debug, Clone)]
pub enum RawButtonOption {
    /// Rendered verbatim; no normalization and no variant import.
    Markup(Template),
    Label(String),
    Partial(PartialButtonSpec),
    Callback(ButtonCallback),
}

impl RawButtonOption {
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&DialogElement) + Send + Sync + 'static,
    {
        Self::Callback(ButtonCallback::new(f))
    }

    /// An empty label is treated like a missing button when deriving defaults.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Label(label) if label.is_empty())
    }
}

impl From<&str> for RawButtonOption {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for RawButtonOption {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<PartialButtonSpec> for RawButtonOption {
    fn from(spec: PartialButtonSpec) -> Self {
        Self::Partial(spec)
    }
}

impl From<ButtonCallback> for RawButtonOption {
    fn from(callback: ButtonCallback) -> Self {
        Self::Callback(callback)
    }
}

impl From<Template> for RawButtonOption {
    fn from(template: Template) -> Self {
        Self::Markup(template)
    }
}

/// The two action slots, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSlot {
    Cancel,
    Confirm,
}

impl ButtonSlot {
    pub fn fallback_label(&self) -> &'static str {
        match self {
            Self::Cancel => "Cancel",
            Self::Confirm => "Confirm",
        }
    }
}

/// Result of normalizing a raw button option.
#[derive(Debug, Clone)]
pub enum NormalizedButton {
    Markup(Template),
    Spec(ButtonSpec),
}

/// Resolve a raw option into its canonical shape.
///
/// `fallback_label` applies when the option itself names no label; without
/// one the label is [`UNDEFINED_LABEL`].
pub fn normalize(raw: &RawButtonOption, fallback_label: Option<&str>) -> NormalizedButton {
    let partial = match raw {
        RawButtonOption::Markup(template) => return NormalizedButton::Markup(template.clone()),
        RawButtonOption::Label(label) => PartialButtonSpec::new().label(label.clone()),
        RawButtonOption::Partial(partial) => {
            let mut partial = partial.clone();
            if partial.label.is_none() {
                partial.label = fallback_label.map(str::to_string);
            }
            partial
        }
        RawButtonOption::Callback(callback) => PartialButtonSpec {
            label: fallback_label.map(str::to_string),
            callback: Some(callback.clone()),
            ..Default::default()
        },
    };

    let defaults = ButtonSpec::default();
    NormalizedButton::Spec(ButtonSpec {
        label: partial.label.unwrap_or(defaults.label),
        variant: partial.variant.unwrap_or(defaults.variant),
        callback: partial.callback.unwrap_or(defaults.callback),
        style: partial.style.or(defaults.style),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{Element, Node};

    fn spec(button: NormalizedButton) -> ButtonSpec {
        match button {
            NormalizedButton::Spec(spec) => spec,
            NormalizedButton::Markup(_) => panic!("expected a normalized spec"),
        }
    }

    #[test]
    fn test_label_string_becomes_spec() {
        let spec = spec(normalize(&"Delete".into(), Some("Confirm")));
        assert_eq!(spec.label, "Delete");
        assert_eq!(spec.variant, ButtonVariant::Text);
        assert!(spec.style.is_none());
    }

    #[test]
    fn test_partial_spec_takes_slot_label() {
        let raw: RawButtonOption = PartialButtonSpec::new().variant("filled").into();
        let spec = spec(normalize(&raw, Some("Confirm")));
        assert_eq!(spec.label, "Confirm");
        assert_eq!(spec.variant, ButtonVariant::Filled);
    }

    #[test]
    fn test_callback_takes_slot_label() {
        let raw = RawButtonOption::callback(|_| {});
        assert_eq!(spec(normalize(&raw, Some("Cancel"))).label, "Cancel");
    }

    #[test]
    fn test_missing_label_without_fallback() {
        let raw: RawButtonOption = PartialButtonSpec::new().into();
        assert_eq!(spec(normalize(&raw, None)).label, UNDEFINED_LABEL);
    }

    #[test]
    fn test_markup_passes_through() {
        let template = Template::from(Node::Element(Element::new("my-button")));
        match normalize(&template.into(), Some("Confirm")) {
            NormalizedButton::Markup(t) => assert_eq!(t.to_html(), "<my-button></my-button>"),
            NormalizedButton::Spec(_) => panic!("markup must not be normalized"),
        }
    }

    #[test]
    fn test_unknown_variant_falls_back_to_text() {
        let variant = ButtonVariant::from("md-outlined-button");
        assert_eq!(variant, ButtonVariant::Text);
        assert_eq!(variant.tag(), "md-text-button");
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(ButtonVariant::from("md-filled-tonal-button"), ButtonVariant::FilledTonal);
        assert_eq!(ButtonVariant::from("Elevated"), ButtonVariant::Elevated);
        assert_eq!(ButtonVariant::from("filled"), ButtonVariant::Filled);

        let parsed: ButtonVariant = serde_json::from_str("\"sparkly\"").unwrap();
        assert_eq!(parsed, ButtonVariant::Text);
    }
}
