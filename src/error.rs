//! Errors surfaced by dialog construction and readiness.

use crate::components::LoadError;
use crate::document::ContainerId;
use std::time::Duration;

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
///
/// Cloneable so a single readiness outcome can be observed by every waiter.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog element has not been rendered yet")]
    NotRendered,

    #[error("Container {0} is not attached to the document")]
    ContainerDetached(ContainerId),

    #[error("Dialog component unavailable: {0}")]
    Load(#[from] LoadError),

    #[error("Dialog was not ready within {0:?}")]
    ReadyTimeout(Duration),

    #[error("Dialog content failed: {0}")]
    ContentFailed(String),
}
