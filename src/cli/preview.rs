//! Preview command: render a dialog, wait for it to become ready and report the result

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use mdialog::markup::{Element, Node};
use mdialog::version;
use mdialog::{
    BuiltinLoader, ButtonVariant, ContentSource, DialogBuilder, DialogPhase, Document,
    OptionsFile, PartialButtonSpec, PartialDialogOptions, Settings, StyleMap,
};

/// Render a dialog and report its markup and lifecycle
#[derive(Debug, Args)]
pub struct PreviewCommand {
    /// JSON file describing the dialog; flags override its fields
    pub file: Option<PathBuf>,

    /// Headline text
    #[arg(long)]
    pub headline: Option<String>,

    /// Body text
    #[arg(long)]
    pub content: Option<String>,

    /// Supply the body through a content function invoked once the dialog is ready
    #[arg(long, requires = "content")]
    pub defer_content: bool,

    /// Confirm button label
    #[arg(long)]
    pub confirm: Option<String>,

    /// Confirm button variant (text, filled, filled-tonal, elevated)
    #[arg(long)]
    pub confirm_variant: Option<String>,

    /// Cancel button label
    #[arg(long, conflicts_with = "no_cancel")]
    pub cancel: Option<String>,

    /// Render no cancel button
    #[arg(long)]
    pub no_cancel: bool,

    /// Keep the dialog open on escape and scrim clicks
    #[arg(long)]
    pub prevent_cancel: bool,

    /// Skip animations
    #[arg(long)]
    pub quick: bool,

    /// Style declaration as key=value; repeatable
    #[arg(long = "style", value_parser = parse_style_pair)]
    pub style: Vec<(String, String)>,

    /// Interaction to simulate once the dialog is open
    #[arg(long)]
    pub simulate: Option<Interaction>,

    /// Override the readiness timeout (e.g. "500ms", "2s")
    #[arg(long, value_parser = humantime::parse_duration)]
    pub ready_timeout: Option<Duration>,

    /// Print a JSON report instead of HTML
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Interaction {
    Escape,
    Scrim,
    Confirm,
    Cancel,
}

/// What a preview observed.
#[derive(Debug, Serialize)]
pub struct PreviewReport {
    /// Name and version of the tool that produced the report.
    pub generator: String,
    pub container: String,
    /// Markup once the dialog was ready and its content settled.
    pub html: String,
    pub interaction: Option<Interaction>,
    pub open: bool,
    pub phase: DialogPhase,
    pub containers_remaining: usize,
}

impl PreviewCommand {
    pub async fn execute(&self, settings: &Settings) -> Result<()> {
        let report = self.run(settings).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report.html);
        }

        Ok(())
    }

    pub async fn run(&self, settings: &Settings) -> Result<PreviewReport> {
        let mut settings = settings.clone();
        if let Some(timeout) = self.ready_timeout {
            settings.ready_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        }

        let options = match &self.file {
            Some(path) => load_options(path).await?.into(),
            None => PartialDialogOptions::new(),
        };
        let options = self.apply(options);

        let loader = BuiltinLoader::with_latency(settings.component_latency());
        let document = Document::new(Arc::new(loader));
        let builder = DialogBuilder::with_settings(&document, options, &settings);

        let dialog = builder
            .initial_render_complete()
            .await
            .context("Dialog did not become ready")?;
        builder.content_settled().await;
        builder.show()?;
        info!(container = %builder.container(), "Dialog open");

        let html = document
            .html(builder.container())
            .unwrap_or_default();

        if let Some(interaction) = self.simulate {
            debug!(?interaction, "Simulating interaction");
            match interaction {
                Interaction::Escape => {
                    dialog.press_escape();
                }
                Interaction::Scrim => {
                    dialog.click_scrim();
                }
                Interaction::Confirm | Interaction::Cancel => match action_button(&builder, interaction) {
                    Some(button) => {
                        button.click();
                    }
                    None => anyhow::bail!("Dialog has no {:?} button", interaction),
                },
            }
        }

        Ok(PreviewReport {
            generator: version::full_version(),
            container: builder.container().to_string(),
            html,
            interaction: self.simulate,
            open: dialog.is_open(),
            phase: builder.phase(),
            containers_remaining: document.container_count(),
        })
    }

    /// Layer command line flags over options read from a file.
    fn apply(&self, mut options: PartialDialogOptions) -> PartialDialogOptions {
        if self.quick {
            options = options.quick(true);
        }
        if let Some(headline) = &self.headline {
            options = options.headline(headline.as_str());
        }
        if let Some(content) = &self.content {
            options = if self.defer_content {
                let content = content.clone();
                options.content(ContentSource::from_fn(move |_dialog| content.clone()))
            } else {
                options.content(content.as_str())
            };
        }

        match (&self.confirm, &self.confirm_variant) {
            (None, None) => {}
            (label, variant) => {
                let mut spec = PartialButtonSpec::new();
                if let Some(label) = label {
                    spec = spec.label(label.as_str());
                }
                if let Some(variant) = variant {
                    spec = spec.variant(ButtonVariant::parse_lenient(variant));
                }
                options = options.confirm_button(spec);
            }
        }

        if self.no_cancel {
            options = options.without_cancel_button();
        } else if let Some(cancel) = &self.cancel {
            options = options.cancel_button(cancel.as_str());
        }

        if self.prevent_cancel {
            options = options.prevent_cancel(true);
        }

        if !self.style.is_empty() {
            let flags: StyleMap = self.style.iter().cloned().collect();
            let style = match options.style.take() {
                Some(style) => flags.merged_over(&style),
                None => flags,
            };
            options = options.style(style);
        }

        options
    }
}

async fn load_options(path: &Path) -> Result<OptionsFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read options file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse options file: {}", path.display()))
}

fn parse_style_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), val.trim().to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", value)),
    }
}

/// Buttons render cancel first, confirm last.
fn action_button(builder: &DialogBuilder, which: Interaction) -> Option<Element> {
    let options = builder.options();
    let present = match which {
        Interaction::Confirm => options.confirm_button.is_some(),
        _ => options.cancel_button.is_some(),
    };
    if !present {
        return None;
    }

    let template = builder.document().template(builder.container())?;
    let actions = template
        .find_all("div")
        .into_iter()
        .find(|div| div.attribute("slot") == Some("actions"))?;
    let mut buttons = actions.child_nodes().iter().filter_map(|node| match node {
        Node::Element(element) => Some(element.clone()),
        _ => None,
    });

    match which {
        Interaction::Confirm => buttons.last(),
        _ => buttons.next(),
    }
}
