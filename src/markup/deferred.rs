//! Deferred content slots.
//!
//! A [`DeferredSlot`] is a placeholder that renders nothing until the
//! future behind it settles, then renders the produced content in place.
//! The slot settles exactly once; later resolutions are ignored.

use crate::options::Content;
use super::Node;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Current state of a deferred slot.
#[derive(Debug, Clone)]
pub enum SlotState {
    Pending,
    Resolved(Content),
    Failed(String),
}

impl SlotState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Clone)]
pub struct DeferredSlot {
    state: Arc<watch::Sender<SlotState>>,
}

impl DeferredSlot {
    pub fn pending() -> Self {
        let (state, _) = watch::channel(SlotState::Pending);
        Self {
            state: Arc::new(state),
        }
    }

    /// Settle the slot with content. Returns false if it had already settled.
    pub fn resolve(&self, content: Content) -> bool {
        self.settle(SlotState::Resolved(content))
    }

    /// Settle the slot as failed. Returns false if it had already settled.
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.settle(SlotState::Failed(reason.into()))
    }

    fn settle(&self, next: SlotState) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_settled() {
                return false;
            }
            *state = next;
            true
        })
    }

    pub fn state(&self) -> SlotState {
        self.state.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.state.borrow().is_settled()
    }

    /// Wait until the slot has settled and return its final state.
    pub async fn settled(&self) -> SlotState {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let settled = match rx.wait_for(SlotState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Nodes to render right now: nothing while pending or after a failure.
    pub fn current_nodes(&self) -> Vec<Node> {
        match &*self.state.borrow() {
            SlotState::Resolved(content) => content.to_nodes(),
            SlotState::Pending | SlotState::Failed(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for DeferredSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredSlot")
            .field("state", &*self.state.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_once() {
        let slot = DeferredSlot::pending();
        assert!(slot.current_nodes().is_empty());

        assert!(slot.resolve(Content::text("first")));
        assert!(!slot.resolve(Content::text("second")));
        assert!(!slot.fail("too late"));

        match slot.state() {
            SlotState::Resolved(Content::Text(text)) => assert_eq!(text, "first"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_settled_wakes_waiters() {
        let slot = DeferredSlot::pending();
        let waiter = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.settled().await })
        };

        tokio::task::yield_now().await;
        slot.fail("boom");

        assert!(matches!(waiter.await.unwrap(), SlotState::Failed(reason) if reason == "boom"));
        assert!(slot.current_nodes().is_empty());
    }
}
