//! Events dispatched to element bindings.

use std::fmt;
use std::sync::Arc;

/// What triggered a cancel attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelSource {
    EscapeKey,
    ScrimClick,
}

/// A dispatched event. Listeners may prevent its default action.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    cancel_source: Option<CancelSource>,
    default_prevented: bool,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cancel_source: None,
            default_prevented: false,
        }
    }

    pub fn cancel(source: CancelSource) -> Self {
        Self {
            cancel_source: Some(source),
            ..Self::new("cancel")
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cancel_source(&self) -> Option<CancelSource> {
        self.cancel_source
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listener bound with [`super::Element::on`].
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(&mut Event) + Send + Sync>);

impl EventHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, event: &mut Event) {
        (self.0)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}
