//! Modal dialog builder
//!
//! A [`DialogBuilder`] turns caller options into a rendered `md-dialog`
//! inside a fresh container of a [`Document`]. Component definitions for the
//! dialog and its buttons load lazily; [`DialogBuilder::initial_render_complete`]
//! resolves once the dialog is upgraded and interactive, and content supplied
//! as a function is only invoked after that point.

pub mod components;
pub mod config;
pub mod dialog;
pub mod document;
pub mod error;
pub mod markup;
pub mod options;
pub mod version;

pub use components::{BuiltinLoader, ComponentDef, ComponentLoader, LoadError};
pub use config::Settings;
pub use dialog::{DialogBuilder, DialogPhase};
pub use document::{ContainerId, DialogElement, Document};
pub use error::{DialogError, DialogResult};
pub use options::{
    ButtonVariant, Content, ContentSource, DialogOptions, OptionsFile, PartialButtonSpec,
    PartialDialogOptions, RawButtonOption, StyleMap,
};
