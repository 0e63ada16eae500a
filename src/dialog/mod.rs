//! Dialog builder and readiness coordination
//!
//! [`DialogBuilder`] turns [`crate::options::PartialDialogOptions`] into a
//! rendered dialog attached to a [`crate::document::Document`], and exposes
//! a one-shot readiness signal callers await before interacting with it.

mod builder;
mod readiness;

pub use builder::{CancelPolicy, DialogBuilder, DialogPhase};
pub use readiness::ReadyCell;
