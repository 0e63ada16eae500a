//! Schema command implementation for dialog option files and settings

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use schemars::schema_for;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use mdialog::{OptionsFile, Settings};

/// Generate and validate JSON schemas
#[derive(Debug, Args)]
pub struct SchemaCommand {
    /// Which document the schema describes
    #[arg(short, long, default_value = "options")]
    pub target: SchemaTarget,

    /// Output format for schema generation
    #[arg(short, long, default_value = "json")]
    pub format: SchemaFormat,

    /// Output file path (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty print the output
    #[arg(short, long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Option<SchemaSubcommand>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaTarget {
    /// Dialog option files read by `mdialog preview`
    Options,
    /// mdialog.json settings files
    Settings,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
pub enum SchemaSubcommand {
    /// Generate the JSON schema
    Generate,
    /// Validate a file against the schema
    Validate {
        /// JSON or YAML file to validate
        file: PathBuf,
    },
}

impl SchemaCommand {
    /// Execute the schema command
    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Some(SchemaSubcommand::Validate { file }) => {
                let problems = self.validate_file(file)?;
                if problems.is_empty() {
                    println!("{} is valid", file.display());
                    Ok(())
                } else {
                    for problem in &problems {
                        println!("  - {}", problem);
                    }
                    Err(anyhow::anyhow!("{} failed validation", file.display()))
                }
            }
            Some(SchemaSubcommand::Generate) | None => {
                let output = self.render_schema()?;
                if let Some(ref output_path) = self.output {
                    fs::write(output_path, output).with_context(|| {
                        format!("Failed to write schema to: {}", output_path.display())
                    })?;
                    println!("Schema written to: {}", output_path.display());
                } else {
                    println!("{}", output);
                }
                Ok(())
            }
        }
    }

    fn schema_value(&self) -> Result<Value> {
        let schema = match self.target {
            SchemaTarget::Options => schema_for!(OptionsFile),
            SchemaTarget::Settings => schema_for!(Settings),
        };
        serde_json::to_value(schema).context("Failed to convert schema to JSON value")
    }

    fn render_schema(&self) -> Result<String> {
        let schema_value = self.schema_value()?;

        let output = match self.format {
            SchemaFormat::Json if self.pretty => serde_json::to_string_pretty(&schema_value)?,
            SchemaFormat::Json => serde_json::to_string(&schema_value)?,
            SchemaFormat::Yaml => {
                serde_yaml::to_string(&schema_value).context("Failed to convert schema to YAML")?
            }
        };

        Ok(output)
    }

    /// Validate `file` and return one message per violation.
    fn validate_file(&self, file: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read file: {}", file.display()))?;

        let is_yaml = matches!(
            file.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let instance: Value = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML: {}", file.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON: {}", file.display()))?
        };

        let schema_value = self.schema_value()?;
        let compiled = jsonschema::JSONSchema::compile(&schema_value)
            .map_err(|e| anyhow::anyhow!("Failed to compile JSON schema: {}", e))?;

        let problems = match compiled.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| format!("{}: {}", error.instance_path, error))
                .collect(),
        };

        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn command(target: SchemaTarget, format: SchemaFormat) -> SchemaCommand {
        SchemaCommand {
            target,
            format,
            output: None,
            pretty: true,
            command: None,
        }
    }

    #[test]
    fn test_options_schema_uses_camel_case() {
        let schema = command(SchemaTarget::Options, SchemaFormat::Json)
            .schema_value()
            .unwrap();
        let properties = &schema["properties"];

        assert!(properties.get("confirmButton").is_some());
        assert!(properties.get("preventCancel").is_some());
        assert!(properties.get("noCancelButton").is_some());
    }

    #[test]
    fn test_yaml_output() {
        let yaml = command(SchemaTarget::Settings, SchemaFormat::Yaml)
            .render_schema()
            .unwrap();
        assert!(yaml.contains("default_width"));
    }

    #[test]
    fn test_validate_options_file() {
        let dir = tempdir().unwrap();
        let valid = dir.path().join("valid.json");
        let invalid = dir.path().join("invalid.json");
        fs::write(&valid, r#"{ "headline": "Hi", "confirmButton": "OK" }"#).unwrap();
        fs::write(&invalid, r#"{ "quick": "yes" }"#).unwrap();

        let cmd = command(SchemaTarget::Options, SchemaFormat::Json);
        assert!(cmd.validate_file(&valid).unwrap().is_empty());
        assert!(!cmd.validate_file(&invalid).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_to_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("schema.json");
        let mut cmd = command(SchemaTarget::Options, SchemaFormat::Json);
        cmd.output = Some(output.clone());

        cmd.execute().await.unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["title"], "OptionsFile");
    }
}
