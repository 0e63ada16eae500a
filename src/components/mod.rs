//! Lazily loaded component definitions
//!
//! Dialog and button elements render as plain markup until their component
//! definition has been loaded. Loading goes through a [`ComponentLoader`];
//! the [`ComponentRegistry`] makes sure each definition is requested from
//! the loader at most once and that every caller observes the same outcome.

mod loader;
mod registry;

pub use loader::{BuiltinLoader, ComponentLoader};
pub use registry::{ComponentRegistry, LoadFuture};

use crate::options::ButtonVariant;
use std::fmt;

/// A loadable component definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentDef {
    Dialog,
    Button(ButtonVariant),
}

impl ComponentDef {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Dialog => "md-dialog",
            Self::Button(variant) => variant.tag(),
        }
    }
}

impl fmt::Display for ComponentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Failure to load a component definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Component '{tag}' failed to load: {reason}")]
    Failed { tag: String, reason: String },
}

impl LoadError {
    pub fn failed(def: ComponentDef, reason: impl Into<String>) -> Self {
        Self::Failed {
            tag: def.tag().to_string(),
            reason: reason.into(),
        }
    }
}
