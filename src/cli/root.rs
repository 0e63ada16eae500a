use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use super::{PreviewCommand, SchemaCommand};
use mdialog::{version, Settings};

/// mdialog - build and preview modal dialogs
#[derive(Parser)]
#[command(
    name = "mdialog",
    version,
    about = "Build and preview modal dialogs",
    long_about = r#"mdialog renders a modal dialog from options, waits for its components to load
and reports the resulting markup and lifecycle.

Examples:
  mdialog preview --headline "Delete file?" --confirm Delete
  mdialog preview dialog.json --simulate escape --json
  mdialog schema --pretty"#
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Settings file to use instead of searching for mdialog.json
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a dialog and report what happened
    Preview(PreviewCommand),
    /// Print or validate the JSON schema of dialog option files
    Schema(SchemaCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled for {}", version::full_version());
        }

        let settings = Settings::init_from(self.config.as_deref()).await?;
        debug!(?settings, "Settings initialized");

        match self.command {
            Commands::Preview(preview) => preview.execute(&settings).await,
            Commands::Schema(schema) => schema.execute().await,
        }
    }
}
