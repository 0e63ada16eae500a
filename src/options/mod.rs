//! Dialog configuration model
//!
//! Defines the caller-facing [`PartialDialogOptions`], the fully resolved
//! [`DialogOptions`] snapshot a builder works from, and the defaulting rules
//! that connect them. Nothing in here performs I/O.

mod button;
mod content;
mod style;

pub use button::{
    normalize, ButtonCallback, ButtonSlot, ButtonSpec, ButtonVariant, NormalizedButton,
    PartialButtonSpec, RawButtonOption, UNDEFINED_LABEL,
};
pub use content::{Content, ContentFn, ContentFuture, ContentSource};
pub use style::StyleMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default dialog width, merged under any caller style.
pub const DEFAULT_WIDTH: &str = "400px";

/// Cancel label when a confirm button is present.
pub const CANCEL_LABEL: &str = "Cancel";

/// Cancel label for a dialog with no confirm button.
pub const CLOSE_LABEL: &str = "Close";

/// Options as supplied by a caller. Every field is optional.
///
/// `cancel_button` is tri-state: `None` takes the default label,
/// `Some(None)` omits the button, `Some(Some(raw))` uses `raw`.
#[derive(Debug, Clone, Default)]
pub struct PartialDialogOptions {
    pub quick: Option<bool>,
    pub headline: Option<Content>,
    pub content: Option<ContentSource>,
    pub confirm_button: Option<RawButtonOption>,
    pub cancel_button: Option<Option<RawButtonOption>>,
    pub prevent_cancel: Option<bool>,
    pub style: Option<StyleMap>,
    /// Deprecated: use `prevent_cancel`.
    pub block_scrim_click: Option<bool>,
    /// Deprecated: use `prevent_cancel`.
    pub block_escape_key: Option<bool>,
}

impl PartialDialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quick(mut self, quick: bool) -> Self {
        self.quick = Some(quick);
        self
    }

    pub fn headline(mut self, headline: impl Into<Content>) -> Self {
        self.headline = Some(headline.into());
        self
    }

    pub fn content(mut self, content: impl Into<ContentSource>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn confirm_button(mut self, button: impl Into<RawButtonOption>) -> Self {
        self.confirm_button = Some(button.into());
        self
    }

    pub fn cancel_button(mut self, button: impl Into<RawButtonOption>) -> Self {
        self.cancel_button = Some(Some(button.into()));
        self
    }

    pub fn without_cancel_button(mut self) -> Self {
        self.cancel_button = Some(None);
        self
    }

    pub fn prevent_cancel(mut self, prevent: bool) -> Self {
        self.prevent_cancel = Some(prevent);
        self
    }

    pub fn style(mut self, style: StyleMap) -> Self {
        self.style = Some(style);
        self
    }
}

/// Resolved options. Every field has a value; computed once per builder.
#[derive(Debug, Clone)]
pub struct DialogOptions {
    /// Skip entrance and exit animations.
    pub quick: bool,
    pub headline: Option<Content>,
    pub content: ContentSource,
    pub confirm_button: Option<RawButtonOption>,
    pub cancel_button: Option<RawButtonOption>,
    /// Suppress dismissal through the escape key or a scrim click.
    pub prevent_cancel: bool,
    pub style: StyleMap,
    pub block_scrim_click: bool,
    pub block_escape_key: bool,
}

impl DialogOptions {
    /// Resolve with the stock default style (`width: 400px`).
    pub fn resolve(partial: PartialDialogOptions) -> Self {
        Self::resolve_with(partial, &StyleMap::width(DEFAULT_WIDTH))
    }

    /// Resolve caller options over the defaults.
    ///
    /// The confirm button is resolved first because the cancel default
    /// depends on it. Caller style is merged over `base_style`, never
    /// replacing it.
    pub fn resolve_with(partial: PartialDialogOptions, base_style: &StyleMap) -> Self {
        let confirm_button = partial.confirm_button;

        let has_confirm = confirm_button.as_ref().is_some_and(|button| !button.is_blank());
        let cancel_button = partial.cancel_button.unwrap_or_else(|| {
            let label = if has_confirm { CANCEL_LABEL } else { CLOSE_LABEL };
            Some(RawButtonOption::Label(label.to_string()))
        });

        let style = match &partial.style {
            Some(style) => style.merged_over(base_style),
            None => base_style.clone(),
        };

        Self {
            quick: partial.quick.unwrap_or(false),
            headline: partial.headline.filter(|headline| !headline.is_empty()),
            content: partial.content.unwrap_or_default(),
            confirm_button,
            cancel_button,
            prevent_cancel: partial.prevent_cancel.unwrap_or(false),
            style,
            block_scrim_click: partial.block_scrim_click.unwrap_or(false),
            block_escape_key: partial.block_escape_key.unwrap_or(false),
        }
    }

    pub fn has_actions(&self) -> bool {
        self.confirm_button.is_some() || self.cancel_button.is_some()
    }
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self::resolve(PartialDialogOptions::default())
    }
}

impl From<PartialDialogOptions> for DialogOptions {
    fn from(partial: PartialDialogOptions) -> Self {
        Self::resolve(partial)
    }
}

/// Button as written in an options file.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ButtonFile {
    Label(String),
    Spec {
        #[serde(default)]
        label: Option<String>,
        /// `text`, `filled`, `filled-tonal` or `elevated`; anything else renders a text button.
        #[serde(default)]
        variant: Option<String>,
        #[serde(default)]
        style: Option<StyleMap>,
    },
}

impl From<ButtonFile> for RawButtonOption {
    fn from(file: ButtonFile) -> Self {
        match file {
            ButtonFile::Label(label) => RawButtonOption::Label(label),
            ButtonFile::Spec { label, variant, style } => RawButtonOption::Partial(PartialButtonSpec {
                label,
                variant: variant.map(ButtonVariant::from),
                callback: None,
                style,
            }),
        }
    }
}

/// Data-only dialog description, loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsFile {
    pub quick: Option<bool>,
    pub headline: Option<String>,
    pub content: Option<String>,
    pub confirm_button: Option<ButtonFile>,
    pub cancel_button: Option<ButtonFile>,
    /// Render no cancel button at all.
    pub no_cancel_button: bool,
    pub prevent_cancel: Option<bool>,
    pub style: Option<StyleMap>,
    pub block_scrim_click: Option<bool>,
    pub block_escape_key: Option<bool>,
}

impl From<OptionsFile> for PartialDialogOptions {
    fn from(file: OptionsFile) -> Self {
        let cancel_button = if file.no_cancel_button {
            Some(None)
        } else {
            file.cancel_button.map(|button| Some(button.into()))
        };

        Self {
            quick: file.quick,
            headline: file.headline.map(Content::Text),
            content: file.content.map(ContentSource::from),
            confirm_button: file.confirm_button.map(Into::into),
            cancel_button,
            prevent_cancel: file.prevent_cancel,
            style: file.style,
            block_scrim_click: file.block_scrim_click,
            block_escape_key: file.block_escape_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancel_label(options: &DialogOptions) -> Option<String> {
        match options.cancel_button.as_ref()? {
            RawButtonOption::Label(label) => Some(label.clone()),
            _ => None,
        }
    }

    #[test]
    fn test_cancel_label_with_confirm() {
        let options = DialogOptions::resolve(PartialDialogOptions::new().confirm_button("Save"));
        assert_eq!(cancel_label(&options).as_deref(), Some(CANCEL_LABEL));
    }

    #[test]
    fn test_cancel_label_without_confirm() {
        let options = DialogOptions::default();
        assert_eq!(cancel_label(&options).as_deref(), Some(CLOSE_LABEL));
        assert!(options.confirm_button.is_none());
    }

    #[test]
    fn test_blank_confirm_label_counts_as_absent() {
        let options = DialogOptions::resolve(PartialDialogOptions::new().confirm_button(""));
        assert_eq!(cancel_label(&options).as_deref(), Some(CLOSE_LABEL));
    }

    #[test]
    fn test_explicit_cancel_is_kept() {
        let options = DialogOptions::resolve(
            PartialDialogOptions::new()
                .confirm_button("Save")
                .cancel_button("Discard"),
        );
        assert_eq!(cancel_label(&options).as_deref(), Some("Discard"));

        let options = DialogOptions::resolve(PartialDialogOptions::new().without_cancel_button());
        assert!(options.cancel_button.is_none());
        assert!(!options.has_actions());
    }

    #[test]
    fn test_defaults_are_resolved() {
        let options = DialogOptions::default();
        assert!(!options.quick);
        assert!(!options.prevent_cancel);
        assert!(options.headline.is_none());
        assert!(!options.content.is_deferred());
        assert_eq!(options.style.get("width"), Some(DEFAULT_WIDTH));
    }

    #[test]
    fn test_style_merges_over_default() {
        let options = DialogOptions::resolve(
            PartialDialogOptions::new().style(StyleMap::new().with("height", "200px")),
        );
        assert_eq!(options.style.get("width"), Some("400px"));
        assert_eq!(options.style.get("height"), Some("200px"));

        let options =
            DialogOptions::resolve(PartialDialogOptions::new().style(StyleMap::width("600px")));
        assert_eq!(options.style.get("width"), Some("600px"));
    }

    #[test]
    fn test_empty_headline_is_absent() {
        let options = DialogOptions::resolve(PartialDialogOptions::new().headline(""));
        assert!(options.headline.is_none());
    }

    #[test]
    fn test_options_file() {
        let json = r#"{
            "headline": "Delete project?",
            "confirmButton": { "label": "Delete", "variant": "filled" },
            "noCancelButton": true,
            "style": { "height": "200px" }
        }"#;
        let file: OptionsFile = serde_json::from_str(json).unwrap();
        let options = DialogOptions::resolve(file.into());

        assert!(options.cancel_button.is_none());
        assert!(matches!(
            options.confirm_button,
            Some(RawButtonOption::Partial(PartialButtonSpec {
                variant: Some(ButtonVariant::Filled),
                ..
            }))
        ));
        assert_eq!(options.style.get("width"), Some("400px"));
    }
}
