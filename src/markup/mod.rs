//! Declarative markup templates
//!
//! A [`Template`] is an ordered list of [`Node`]s describing what should be
//! rendered into a container. Elements carry attributes, boolean attributes,
//! event bindings and, for the dialog itself, a reference binding that the
//! document fills in with the live element when the template is rendered.

mod deferred;
mod event;

pub use deferred::{DeferredSlot, SlotState};
pub use event::{CancelSource, Event, EventHandler};

use crate::document::DialogRef;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use v_htmlescape::escape;

/// One node of a template.
#[derive(Debug, Clone)]
pub enum Node {
    Text(String),
    Comment(String),
    Element(Element),
    /// Placeholder whose content arrives later.
    Deferred(DeferredSlot),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<DeferredSlot> for Node {
    fn from(slot: DeferredSlot) -> Self {
        Self::Deferred(slot)
    }
}

/// An element with its bindings.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    flags: BTreeSet<String>,
    listeners: Vec<(String, EventHandler)>,
    dialog_ref: Option<DialogRef>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            flags: BTreeSet::new(),
            listeners: Vec::new(),
            dialog_ref: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the attribute only when a value is present.
    pub fn attr_opt(self, name: impl Into<String>, value: Option<String>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Boolean attribute: present when `on` is true.
    pub fn flag(mut self, name: impl Into<String>, on: bool) -> Self {
        let name = name.into();
        if on {
            self.flags.insert(name);
        } else {
            self.flags.remove(&name);
        }
        self
    }

    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Event) + Send + Sync + 'static,
    {
        self.listeners.push((event.into(), EventHandler::new(handler)));
        self
    }

    /// Bind the live dialog element created for this node into `dialog_ref`.
    pub fn bind_dialog(mut self, dialog_ref: &DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref.clone());
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn dialog_ref(&self) -> Option<&DialogRef> {
        self.dialog_ref.as_ref()
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn listeners(&self) -> &[(String, EventHandler)] {
        &self.listeners
    }

    /// Dispatch an event to this element's listeners.
    pub fn dispatch(&self, event: &mut Event) {
        for (name, handler) in &self.listeners {
            if name == event.name() {
                handler.call(event);
            }
        }
    }

    pub fn click(&self) -> Event {
        let mut event = Event::new("click");
        self.dispatch(&mut event);
        event
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text.trim().to_string()
    }
}

/// An ordered list of nodes.
#[derive(Debug, Clone, Default)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, node: impl Into<Node>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn extend(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every element with `tag`, in document order. Resolved deferred
    /// content is searched as well.
    pub fn find_all(&self, tag: &str) -> Vec<Element> {
        let mut found = Vec::new();
        find_elements(&self.nodes, tag, &mut found);
        found
    }

    pub fn find(&self, tag: &str) -> Option<Element> {
        self.find_all(tag).into_iter().next()
    }

    /// Serialize to HTML as currently rendered.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }
}

impl From<Node> for Template {
    fn from(node: Node) -> Self {
        Self { nodes: vec![node] }
    }
}

impl From<Element> for Template {
    fn from(element: Element) -> Self {
        Self::from(Node::Element(element))
    }
}

impl FromIterator<Node> for Template {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

fn find_elements(nodes: &[Node], tag: &str, found: &mut Vec<Element>) {
    for node in nodes {
        match node {
            Node::Element(element) => {
                if element.tag == tag {
                    found.push(element.clone());
                }
                find_elements(&element.children, tag, found);
            }
            Node::Deferred(slot) => find_elements(&slot.current_nodes(), tag, found),
            Node::Text(_) | Node::Comment(_) => {}
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Deferred(slot) => collect_text(&slot.current_nodes(), out),
            Node::Comment(_) => {}
        }
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => {
                let _ = write!(out, "{}", escape(text));
            }
            Node::Comment(text) => {
                let _ = write!(out, "<!--{}-->", text);
            }
            Node::Element(element) => write_element(element, out),
            Node::Deferred(slot) => write_nodes(&slot.current_nodes(), out),
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    let _ = write!(out, "<{}", element.tag);
    for flag in &element.flags {
        let _ = write!(out, " {}", flag);
    }
    for (name, value) in &element.attributes {
        let _ = write!(out, " {}=\"{}\"", name, escape(value));
    }
    out.push('>');
    write_nodes(&element.children, out);
    let _ = write!(out, "</{}>", element.tag);
}
