//! The dialog builder.
//!
//! Construction resolves options, attaches a container to the document,
//! renders the dialog template into it and starts loading the dialog
//! component. Readiness settles once the component has loaded and the
//! element has finished its first update; deferred content waits for it.

use super::ReadyCell;
use crate::components::{ComponentDef, LoadFuture};
use crate::config::Settings;
use crate::document::{ContainerId, DialogElement, DialogRef, Document};
use crate::error::{DialogError, DialogResult};
use crate::markup::{DeferredSlot, Element, Node, SlotState, Template};
use crate::options::{
    normalize, ButtonSlot, Content, ContentFn, ContentSource, DialogOptions, NormalizedButton,
    PartialDialogOptions, RawButtonOption, StyleMap,
};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Lifecycle of one dialog. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogPhase {
    Constructed,
    /// Template rendered; the element may not be upgraded yet.
    Rendered,
    Ready,
    /// Container removed after the dialog closed.
    Closed,
}

/// Whether the dialog suppresses cancel attempts.
///
/// The deprecated `block_scrim_click` and `block_escape_key` options are
/// accepted but have no effect; `prevent_cancel` alone decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelPolicy {
    pub prevent_cancel: bool,
}

impl CancelPolicy {
    pub fn from_options(options: &DialogOptions) -> Self {
        if options.block_scrim_click || options.block_escape_key {
            debug!(
                block_scrim_click = options.block_scrim_click,
                block_escape_key = options.block_escape_key,
                "Ignoring deprecated cancel flags; use prevent_cancel"
            );
        }

        Self {
            prevent_cancel: options.prevent_cancel,
        }
    }

    pub fn prevents(&self) -> bool {
        self.prevent_cancel
    }
}

/// Builds one modal dialog and owns its lifecycle.
pub struct DialogBuilder {
    options: Arc<DialogOptions>,
    document: Document,
    container: ContainerId,
    dialog_ref: DialogRef,
    ready: Arc<ReadyCell<DialogElement>>,
    content_slot: Option<DeferredSlot>,
}

impl DialogBuilder {
    /// Build a dialog with default settings.
    pub fn new(document: &Document, options: PartialDialogOptions) -> Self {
        Self::with_settings(document, options, &Settings::default())
    }

    pub fn with_settings(
        document: &Document,
        options: PartialDialogOptions,
        settings: &Settings,
    ) -> Self {
        let options = Arc::new(DialogOptions::resolve_with(options, &settings.base_style()));

        // Attached before rendering so later component upgrades apply in place.
        let container = document.attach_container();
        debug!(%container, "Attached dialog container");

        let import = document.import(ComponentDef::Dialog);
        let content_slot = options.content.is_deferred().then(DeferredSlot::pending);

        let builder = Self {
            content_slot,
            options,
            document: document.clone(),
            container,
            dialog_ref: DialogRef::new(),
            ready: Arc::new(ReadyCell::new()),
        };

        let template = builder.render_template();
        if let Err(e) = document.render(template, container) {
            warn!(error = %e, "Failed to render dialog template");
        }

        builder.spawn_upgrade(import, settings.ready_timeout());
        builder
    }

    /// Resolves once the dialog element is upgraded and interactive.
    ///
    /// Every call observes the same outcome and the same element.
    pub async fn initial_render_complete(&self) -> DialogResult<DialogElement> {
        self.ready.wait().await
    }

    /// Readiness outcome, if it has settled.
    pub fn readiness(&self) -> Option<DialogResult<DialogElement>> {
        self.ready.get()
    }

    /// Wait for content supplied as a function to settle. Returns at once
    /// for static content.
    pub async fn content_settled(&self) -> Option<SlotState> {
        match &self.content_slot {
            Some(slot) => Some(slot.settled().await),
            None => None,
        }
    }

    /// The live dialog element, once rendered.
    pub fn dialog(&self) -> Option<DialogElement> {
        self.dialog_ref.get()
    }

    /// Open the dialog.
    ///
    /// Await [`Self::initial_render_complete`] first. A call made after the
    /// reference is bound but before the upgrade opens the element at once,
    /// while it is still inert markup.
    pub fn show(&self) -> DialogResult<()> {
        let dialog = self.dialog().ok_or(DialogError::NotRendered)?;
        dialog.show();
        Ok(())
    }

    pub fn options(&self) -> &DialogOptions {
        &self.options
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn phase(&self) -> DialogPhase {
        if !self.document.contains(self.container) {
            DialogPhase::Closed
        } else if matches!(self.ready.get(), Some(Ok(_))) {
            DialogPhase::Ready
        } else if self.dialog_ref.is_set() {
            DialogPhase::Rendered
        } else {
            DialogPhase::Constructed
        }
    }

    fn spawn_upgrade(&self, import: LoadFuture, timeout: Option<Duration>) {
        let dialog_ref = self.dialog_ref.clone();
        let ready = self.ready.clone();
        let container = self.container;

        self.document.spawn(async move {
            let upgrade = wait_for_upgrade(import, dialog_ref);
            let outcome = match timeout {
                Some(limit) => tokio::time::timeout(limit, upgrade)
                    .await
                    .unwrap_or(Err(DialogError::ReadyTimeout(limit))),
                None => upgrade.await,
            };

            match &outcome {
                Ok(_) => debug!(%container, "Dialog ready"),
                Err(e) => warn!(%container, error = %e, "Dialog did not become ready"),
            }
            ready.settle(outcome);
        });
    }

    fn render_template(&self) -> Template {
        let options = &self.options;

        let policy = CancelPolicy::from_options(options);
        let document = self.document.downgrade();
        let container = self.container;

        let dialog = Element::new(ComponentDef::Dialog.tag())
            .bind_dialog(&self.dialog_ref)
            .flag("quick", options.quick)
            .attr_opt("style", options.style.to_css())
            .on("cancel", move |event| {
                if policy.prevents() {
                    event.prevent_default();
                }
            })
            .on("closed", move |_| {
                if let Some(document) = document.upgrade() {
                    if !document.remove_container(container) {
                        debug!(%container, "Closed signal for a container already removed");
                    }
                }
            })
            .child(Node::comment(" headline "))
            .children(self.render_headline())
            .child(Node::comment(" content "))
            .child(
                Element::new("div")
                    .attr("slot", "content")
                    .children(self.render_content()),
            )
            .child(Node::comment(" actions "))
            .children(self.render_actions());

        Template::new()
            .push(Node::comment(""))
            .push(dialog)
            .push(Node::comment(""))
    }

    fn render_headline(&self) -> Vec<Node> {
        match &self.options.headline {
            Some(headline) => vec![Element::new("div")
                .attr("slot", "headline")
                .children(headline.to_nodes())
                .into()],
            None => Vec::new(),
        }
    }

    fn render_content(&self) -> Vec<Node> {
        match &self.options.content {
            ContentSource::Static(content) => content.to_nodes(),
            ContentSource::Deferred(content_fn) => {
                let Some(slot) = self.content_slot.clone() else {
                    return Vec::new();
                };
                let target = slot.clone();
                let ready = self.ready.clone();
                let content_fn = content_fn.clone();

                self.document.spawn(async move {
                    match resolve_content(ready, content_fn).await {
                        Ok(content) => {
                            target.resolve(content);
                        }
                        Err(e) => {
                            error!(error = %e, "Dialog content failed to render");
                            target.fail(e.to_string());
                        }
                    }
                });

                vec![slot.into()]
            }
        }
    }

    fn render_actions(&self) -> Vec<Node> {
        if !self.options.has_actions() {
            return Vec::new();
        }

        let actions = Element::new("div")
            .attr("slot", "actions")
            .children(self.render_button(self.options.cancel_button.as_ref(), ButtonSlot::Cancel))
            .children(self.render_button(self.options.confirm_button.as_ref(), ButtonSlot::Confirm));

        vec![actions.into()]
    }

    fn render_button(&self, raw: Option<&RawButtonOption>, slot: ButtonSlot) -> Vec<Node> {
        let Some(raw) = raw else {
            return Vec::new();
        };

        let spec = match normalize(raw, Some(slot.fallback_label())) {
            NormalizedButton::Markup(template) => return template.nodes().to_vec(),
            NormalizedButton::Spec(spec) => spec,
        };

        let component = ComponentDef::Button(spec.variant);
        // Fire and forget: the button upgrades in place once its definition lands.
        let _ = self.document.import(component);

        let dialog_ref = self.dialog_ref.clone();
        let callback = spec.callback.clone();
        let button = Element::new(component.tag())
            .attr_opt("style", spec.style.as_ref().and_then(StyleMap::to_css))
            .on("click", move |_| match dialog_ref.get() {
                Some(dialog) => callback.invoke(&dialog),
                None => warn!("Dialog button clicked before the dialog was rendered"),
            })
            .child(Node::text(spec.label));

        vec![button.into()]
    }
}

impl std::fmt::Debug for DialogBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogBuilder")
            .field("container", &self.container)
            .field("phase", &self.phase())
            .finish()
    }
}

async fn wait_for_upgrade(import: LoadFuture, dialog_ref: DialogRef) -> DialogResult<DialogElement> {
    import.await?;
    let dialog = dialog_ref.get().ok_or(DialogError::NotRendered)?;
    dialog.update_complete().await;
    Ok(dialog)
}

async fn resolve_content(
    ready: Arc<ReadyCell<DialogElement>>,
    content_fn: ContentFn,
) -> DialogResult<Content> {
    let dialog = ready.wait().await?;
    let produce = async move { content_fn(dialog).await };

    match AssertUnwindSafe(produce).catch_unwind().await {
        Ok(result) => result.map_err(|e| DialogError::ContentFailed(format!("{:#}", e))),
        Err(panic) => Err(DialogError::ContentFailed(panic_message(panic.as_ref()))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("content function panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("content function panicked: {}", message)
    } else {
        "content function panicked".to_string()
    }
}
