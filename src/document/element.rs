//! The live dialog element.
//!
//! Created by [`super::Document::render`] for every template element that
//! carries a dialog reference binding. Until its tag is defined the element
//! is inert markup; [`DialogElement::update_complete`] resolves once it has
//! been upgraded and finished its first update.

use crate::markup::{CancelSource, Element, Event, EventHandler};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// Consecutive prevented escapes after which the dialog closes anyway.
const ESCAPE_STRIKES_TO_CLOSE: u8 = 2;

#[derive(Debug, Default)]
struct ElementState {
    open: bool,
    prevented_escapes: u8,
}

struct DialogInner {
    tag: String,
    quick: bool,
    style: Option<String>,
    listeners: Vec<(String, EventHandler)>,
    upgraded: watch::Sender<bool>,
    state: Mutex<ElementState>,
}

/// Handle to a rendered dialog. Clones refer to the same element.
#[derive(Clone)]
pub struct DialogElement {
    inner: Arc<DialogInner>,
}

impl DialogElement {
    pub(crate) fn from_element(element: &Element) -> Self {
        let (upgraded, _) = watch::channel(false);
        Self {
            inner: Arc::new(DialogInner {
                tag: element.tag().to_string(),
                quick: element.has_flag("quick"),
                style: element.attribute("style").map(str::to_string),
                listeners: element.listeners().to_vec(),
                upgraded,
                state: Mutex::new(ElementState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ElementState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    pub fn quick(&self) -> bool {
        self.inner.quick
    }

    /// Inline style the element was rendered with.
    pub fn style(&self) -> Option<&str> {
        self.inner.style.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn is_upgraded(&self) -> bool {
        *self.inner.upgraded.borrow()
    }

    pub(crate) fn upgrade(&self) {
        if !self.inner.upgraded.send_replace(true) {
            debug!(tag = %self.inner.tag, "Upgraded dialog element");
        }
    }

    /// Resolves after the element has been upgraded and one update turn has run.
    pub async fn update_complete(&self) {
        let mut upgraded = self.inner.upgraded.subscribe();
        // The sender is owned by `self`, so waiting cannot observe a closed channel.
        let _ = upgraded.wait_for(|upgraded| *upgraded).await;
        tokio::task::yield_now().await;
    }

    /// Open the dialog, emitting `open` and `opened`. Works before the
    /// upgrade too; the element opens as inert markup.
    pub fn show(&self) {
        {
            let mut state = self.state();
            if state.open {
                return;
            }
            state.open = true;
            state.prevented_escapes = 0;
        }

        if !self.is_upgraded() {
            debug!("show() called before the dialog was upgraded");
        }
        self.emit("open");
        self.emit("opened");
    }

    /// Close the dialog, emitting `close` and `closed`. No-op when not open.
    pub fn close(&self) {
        {
            let mut state = self.state();
            if !state.open {
                return;
            }
            state.open = false;
        }

        self.emit("close");
        self.emit("closed");
    }

    /// Dispatch an event to the listeners bound in the template.
    pub fn dispatch(&self, event: &mut Event) {
        for (name, handler) in &self.inner.listeners {
            if name == event.name() {
                handler.call(event);
            }
        }
    }

    /// Dispatch a plain event by name.
    pub fn emit(&self, name: &str) -> Event {
        let mut event = Event::new(name);
        self.dispatch(&mut event);
        event
    }

    /// Simulate an escape key press. Returns true if the dialog closed.
    ///
    /// A prevented cancel keeps the dialog open, but a second consecutive
    /// prevented escape closes it regardless.
    pub fn press_escape(&self) -> bool {
        if !self.is_open() {
            return false;
        }

        let event = self.cancel(CancelSource::EscapeKey);
        if event.default_prevented() {
            let strikes = {
                let mut state = self.state();
                state.prevented_escapes += 1;
                state.prevented_escapes
            };
            if strikes < ESCAPE_STRIKES_TO_CLOSE {
                return false;
            }
            debug!("Repeated escape closes the dialog despite prevented cancel");
        }

        self.state().prevented_escapes = 0;
        self.close();
        true
    }

    /// Simulate a click on the scrim. Returns true if the dialog closed.
    pub fn click_scrim(&self) -> bool {
        if !self.is_open() {
            return false;
        }

        if self.cancel(CancelSource::ScrimClick).default_prevented() {
            return false;
        }

        self.close();
        true
    }

    fn cancel(&self, source: CancelSource) -> Event {
        let mut event = Event::cancel(source);
        self.dispatch(&mut event);
        event
    }

    pub fn ptr_eq(&self, other: &DialogElement) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for DialogElement {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for DialogElement {}

impl fmt::Debug for DialogElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogElement")
            .field("tag", &self.inner.tag)
            .field("quick", &self.inner.quick)
            .field("upgraded", &self.is_upgraded())
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn element_with_counter(event: &'static str, prevent: bool) -> (DialogElement, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let element = Element::new("md-dialog").on(event, move |e| {
            counter.fetch_add(1, Ordering::SeqCst);
            if prevent {
                e.prevent_default();
            }
        });
        (DialogElement::from_element(&element), count)
    }

    #[test]
    fn test_show_and_close_emit_once() {
        let (dialog, closed) = element_with_counter("closed", false);
        dialog.show();
        assert!(dialog.is_open());

        dialog.close();
        dialog.close();
        assert!(!dialog.is_open());
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unprevented_escape_closes() {
        let (dialog, cancels) = element_with_counter("cancel", false);
        dialog.show();
        assert!(dialog.press_escape());
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_second_prevented_escape_closes_anyway() {
        let (dialog, cancels) = element_with_counter("cancel", true);
        dialog.show();

        assert!(!dialog.press_escape());
        assert!(dialog.is_open());
        assert!(dialog.press_escape());
        assert!(!dialog.is_open());
        assert_eq!(cancels.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_prevented_scrim_click_keeps_dialog_open() {
        let (dialog, _) = element_with_counter("cancel", true);
        dialog.show();
        assert!(!dialog.click_scrim());
        assert!(!dialog.click_scrim());
        assert!(dialog.is_open());
    }

    #[tokio::test]
    async fn test_update_complete_waits_for_upgrade() {
        let dialog = DialogElement::from_element(&Element::new("md-dialog"));
        assert!(!dialog.is_upgraded());

        let waiter = {
            let dialog = dialog.clone();
            tokio::spawn(async move { dialog.update_complete().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        dialog.upgrade();
        waiter.await.unwrap();
        assert!(dialog.is_upgraded());
    }
}
