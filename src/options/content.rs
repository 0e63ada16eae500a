//! Headline and body content sources.

use crate::document::DialogElement;
use crate::markup::{Node, Template};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Renderable content: plain text or a pre-built markup fragment.
#[derive(Debug, Clone)]
pub enum Content {
    Text(String),
    Markup(Template),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Empty text counts as absent content.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Markup(template) => template.is_empty(),
        }
    }

    pub fn to_nodes(&self) -> Vec<Node> {
        match self {
            Self::Text(text) => vec![Node::text(text.clone())],
            Self::Markup(template) => template.nodes().to_vec(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Template> for Content {
    fn from(template: Template) -> Self {
        Self::Markup(template)
    }
}

pub type ContentFuture = BoxFuture<'static, anyhow::Result<Content>>;

/// Function producing content once the dialog element is live.
pub type ContentFn = Arc<dyn Fn(DialogElement) -> ContentFuture + Send + Sync>;

/// Where the dialog body comes from.
#[derive(Clone)]
pub enum ContentSource {
    /// Rendered directly into the content slot.
    Static(Content),
    /// Invoked with the live dialog after readiness; the slot stays empty until it settles.
    Deferred(ContentFn),
}

impl ContentSource {
    /// Synchronous content function.
    pub fn from_fn<F, C>(f: F) -> Self
    where
        F: Fn(DialogElement) -> C + Send + Sync + 'static,
        C: Into<Content>,
    {
        Self::Deferred(Arc::new(move |dialog| {
            let content = f(dialog).into();
            futures::future::ready(Ok(content)).boxed()
        }))
    }

    /// Content function returning a future.
    pub fn from_async<F, Fut, C>(f: F) -> Self
    where
        F: Fn(DialogElement) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<C>> + Send + 'static,
        C: Into<Content>,
    {
        Self::Deferred(Arc::new(move |dialog| {
            let fut = f(dialog);
            async move { fut.await.map(Into::into) }.boxed()
        }))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl Default for ContentSource {
    fn default() -> Self {
        Self::Static(Content::default())
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(content) => f.debug_tuple("Static").field(content).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Content> for ContentSource {
    fn from(content: Content) -> Self {
        Self::Static(content)
    }
}

impl From<&str> for ContentSource {
    fn from(text: &str) -> Self {
        Self::Static(text.into())
    }
}

impl From<String> for ContentSource {
    fn from(text: String) -> Self {
        Self::Static(text.into())
    }
}

impl From<Template> for ContentSource {
    fn from(template: Template) -> Self {
        Self::Static(template.into())
    }
}
