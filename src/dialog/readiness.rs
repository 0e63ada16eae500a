//! One-shot readiness signal.

use crate::error::{DialogError, DialogResult};
use std::fmt;
use tokio::sync::watch;

/// Settles exactly once; every past and future waiter observes the same outcome.
pub struct ReadyCell<T> {
    outcome: watch::Sender<Option<DialogResult<T>>>,
}

impl<T: Clone> ReadyCell<T> {
    pub fn new() -> Self {
        let (outcome, _) = watch::channel(None);
        Self { outcome }
    }

    /// Record the outcome. Only the first call has any effect.
    pub fn settle(&self, outcome: DialogResult<T>) -> bool {
        self.outcome.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(outcome);
            true
        })
    }

    pub fn get(&self) -> Option<DialogResult<T>> {
        self.outcome.borrow().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    pub async fn wait(&self) -> DialogResult<T> {
        let mut rx = self.outcome.subscribe();
        let settled = rx.wait_for(Option::is_some).await;
        match settled.as_deref() {
            Ok(Some(outcome)) => outcome.clone(),
            // Unreachable while `self` holds the sender and the predicate held.
            _ => Err(DialogError::NotRendered),
        }
    }
}

impl<T: Clone> Default for ReadyCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ReadyCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyCell")
            .field("settled", &self.outcome.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_first_outcome_wins() {
        let cell = ReadyCell::new();
        assert!(cell.get().is_none());

        assert!(cell.settle(Ok(1)));
        assert!(!cell.settle(Ok(2)));
        assert!(!cell.settle(Err(DialogError::NotRendered)));

        assert!(matches!(cell.get(), Some(Ok(1))));
    }

    #[tokio::test]
    async fn test_waiters_before_and_after_settle() {
        let cell = Arc::new(ReadyCell::new());

        let early = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.wait().await })
        };
        tokio::task::yield_now().await;

        cell.settle(Ok("dialog"));
        assert!(matches!(early.await.unwrap(), Ok("dialog")));
        assert!(matches!(cell.wait().await, Ok("dialog")));
        assert!(matches!(cell.wait().await, Ok("dialog")));
    }

    #[tokio::test]
    async fn test_error_outcome_is_shared() {
        let cell: ReadyCell<u8> = ReadyCell::new();
        cell.settle(Err(DialogError::ReadyTimeout(Duration::from_millis(5))));

        assert!(matches!(cell.wait().await, Err(DialogError::ReadyTimeout(_))));
        assert!(cell.is_settled());
    }
}
