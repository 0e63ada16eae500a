//! In-process host document
//!
//! The document owns the containers attached to its body, knows which
//! component tags have been defined, and drives deferred work on the Tokio
//! runtime it was created on. Rendering a template into a container binds
//! live [`DialogElement`]s into their reference cells; elements whose tag is
//! not yet defined are upgraded in place when [`Document::define`] runs.

mod element;

pub use element::DialogElement;

use crate::components::{ComponentDef, ComponentLoader, ComponentRegistry, LoadFuture};
use crate::error::{DialogError, DialogResult};
use crate::markup::{Node, Template};
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identifies a container attached to the document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(Uuid);

impl ContainerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container-{}", self.0.simple())
    }
}

/// Reference cell written once by the renderer, read afterwards.
#[derive(Clone, Default)]
pub struct DialogRef(Arc<OnceLock<DialogElement>>);

impl DialogRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<DialogElement> {
        self.0.get().cloned()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }

    fn set(&self, element: DialogElement) -> bool {
        self.0.set(element).is_ok()
    }
}

impl fmt::Debug for DialogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DialogRef").field(&self.0.get()).finish()
    }
}

struct DocumentInner {
    body: Mutex<Vec<(ContainerId, Template)>>,
    defined: Mutex<HashSet<String>>,
    awaiting_upgrade: Mutex<Vec<DialogElement>>,
    registry: ComponentRegistry,
    runtime: Handle,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared handle to the host document.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

/// Non-owning handle, used by bindings that must not keep the document alive.
#[derive(Clone)]
pub struct WeakDocument(Weak<DocumentInner>);

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.0.upgrade().map(|inner| Document { inner })
    }
}

impl Document {
    /// Create a document on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn new(loader: Arc<dyn ComponentLoader>) -> Self {
        Self::with_runtime(loader, Handle::current())
    }

    pub fn with_runtime(loader: Arc<dyn ComponentLoader>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                body: Mutex::new(Vec::new()),
                defined: Mutex::new(HashSet::new()),
                awaiting_upgrade: Mutex::new(Vec::new()),
                registry: ComponentRegistry::new(loader),
                runtime,
            }),
        }
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument(Arc::downgrade(&self.inner))
    }

    /// Create an empty container and append it to the body.
    pub fn attach_container(&self) -> ContainerId {
        let id = ContainerId::new();
        lock(&self.inner.body).push((id, Template::new()));
        id
    }

    pub fn contains(&self, id: ContainerId) -> bool {
        lock(&self.inner.body).iter().any(|(existing, _)| *existing == id)
    }

    pub fn container_count(&self) -> usize {
        lock(&self.inner.body).len()
    }

    pub fn container_ids(&self) -> Vec<ContainerId> {
        lock(&self.inner.body).iter().map(|(id, _)| *id).collect()
    }

    /// Detach a container. Returns false if it was already gone.
    pub fn remove_container(&self, id: ContainerId) -> bool {
        let removed = {
            let mut body = lock(&self.inner.body);
            body.iter()
                .position(|(existing, _)| *existing == id)
                .map(|index| body.remove(index))
        };

        match removed {
            Some(_) => {
                debug!(container = %id, "Removed container");
                true
            }
            None => false,
        }
    }

    /// Render `template` into an attached container, replacing its content.
    pub fn render(&self, template: Template, id: ContainerId) -> DialogResult<()> {
        if !self.contains(id) {
            return Err(DialogError::ContainerDetached(id));
        }

        self.bind_elements(template.nodes());

        let mut body = lock(&self.inner.body);
        match body.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, content)) => {
                *content = template;
                Ok(())
            }
            None => Err(DialogError::ContainerDetached(id)),
        }
    }

    fn bind_elements(&self, nodes: &[Node]) {
        for node in nodes {
            let Node::Element(element) = node else {
                continue;
            };

            if let Some(dialog_ref) = element.dialog_ref() {
                let dialog = DialogElement::from_element(element);
                if !dialog_ref.set(dialog.clone()) {
                    warn!(tag = element.tag(), "Dialog reference already bound; keeping the first element");
                } else {
                    let defined = lock(&self.inner.defined);
                    if defined.contains(element.tag()) {
                        drop(defined);
                        dialog.upgrade();
                    } else {
                        lock(&self.inner.awaiting_upgrade).push(dialog);
                    }
                }
            }

            self.bind_elements(element.child_nodes());
        }
    }

    /// Register a component tag and upgrade elements waiting for it.
    pub fn define(&self, tag: &str) -> bool {
        let ready: Vec<DialogElement> = {
            let mut defined = lock(&self.inner.defined);
            if !defined.insert(tag.to_string()) {
                return false;
            }

            let mut waiting = lock(&self.inner.awaiting_upgrade);
            let (ready, still_waiting): (Vec<_>, Vec<_>) =
                waiting.drain(..).partition(|element| element.tag() == tag);
            *waiting = still_waiting;
            ready
        };
        debug!(tag, "Defined component");

        for element in ready {
            element.upgrade();
        }
        true
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        lock(&self.inner.defined).contains(tag)
    }

    /// Start loading a component definition. Repeated requests share one load.
    pub fn import(&self, def: ComponentDef) -> LoadFuture {
        self.inner.registry.ensure(def, self.downgrade(), &self.inner.runtime)
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.inner.registry
    }

    /// Current content of a container.
    pub fn template(&self, id: ContainerId) -> Option<Template> {
        lock(&self.inner.body)
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, template)| template.clone())
    }

    pub fn html(&self, id: ContainerId) -> Option<String> {
        self.template(id).map(|template| template.to_html())
    }

    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.runtime.spawn(future)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("containers", &self.container_count())
            .finish()
    }
}
