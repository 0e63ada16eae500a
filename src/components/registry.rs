use super::{ComponentDef, ComponentLoader, LoadError};
use crate::document::WeakDocument;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Outcome of a component load, shared by every requester.
pub type LoadFuture = Shared<BoxFuture<'static, Result<(), LoadError>>>;

/// Memoized mapping from component definition to its load.
pub struct ComponentRegistry {
    loader: Arc<dyn ComponentLoader>,
    loads: Mutex<HashMap<ComponentDef, LoadFuture>>,
}

impl ComponentRegistry {
    pub fn new(loader: Arc<dyn ComponentLoader>) -> Self {
        Self {
            loader,
            loads: Mutex::new(HashMap::new()),
        }
    }

    /// Return the load for `def`, starting it on `runtime` if this is the
    /// first request. On success the tag is defined on `document`.
    pub(crate) fn ensure(
        &self,
        def: ComponentDef,
        document: WeakDocument,
        runtime: &Handle,
    ) -> LoadFuture {
        let mut loads = self.loads.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(load) = loads.get(&def) {
            return load.clone();
        }

        let loader = self.loader.clone();
        let load = async move {
            debug!(component = %def, "Loading component definition");
            match loader.load(def).await {
                Ok(()) => {
                    if let Some(document) = document.upgrade() {
                        document.define(def.tag());
                    }
                    Ok(())
                }
                Err(e) => {
                    warn!(component = %def, error = %e, "Component definition failed to load");
                    Err(e)
                }
            }
        }
        .boxed()
        .shared();

        loads.insert(def, load.clone());
        // Drive the load eagerly; requesters may never await it.
        runtime.spawn(load.clone());
        load
    }

    pub fn is_requested(&self, def: ComponentDef) -> bool {
        self.loads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&def)
    }

    /// Number of distinct definitions requested so far.
    pub fn requested_count(&self) -> usize {
        self.loads.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
