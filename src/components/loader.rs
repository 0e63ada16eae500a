use super::{ComponentDef, LoadError};
use async_trait::async_trait;
use std::time::Duration;

/// Loads the definition of a component so its elements can be upgraded.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    async fn load(&self, def: ComponentDef) -> Result<(), LoadError>;
}

/// Loader for the built-in dialog and button components.
///
/// Definitions are always available; `latency` simulates the cost of
/// fetching them.
#[derive(Debug, Clone, Default)]
pub struct BuiltinLoader {
    latency: Duration,
}

impl BuiltinLoader {
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl ComponentLoader for BuiltinLoader {
    async fn load(&self, _def: ComponentDef) -> Result<(), LoadError> {
        if self.latency.is_zero() {
            // Loading always completes on a later turn, never inline.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}
