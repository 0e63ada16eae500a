use crate::options::{StyleMap, DEFAULT_WIDTH};
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Ambient settings shared by every dialog built through the CLI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Width applied to dialogs that do not set one in their style
    pub default_width: String,

    /// How long to wait for a dialog to become ready; 0 waits forever
    pub ready_timeout_ms: u64,

    /// Simulated load time of the builtin component definitions
    pub component_latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WIDTH.to_string(),
            ready_timeout_ms: 30_000,
            component_latency_ms: 0,
        }
    }
}

impl Settings {
    /// Initialize settings, reading `path` instead of searching when given
    pub async fn init_from(path: Option<&Path>) -> Result<Self> {
        debug!("Initializing settings");

        let mut settings = match path {
            Some(path) => Self::load_from_path(path).await?,
            None => match Self::load_from_file().await {
                Ok(settings) => settings,
                Err(e) => {
                    debug!("Using default settings: {}", e);
                    Self::default()
                }
            },
        };

        // Environment overrides files
        settings.load_from_env();
        settings.validate()?;

        Ok(settings)
    }

    /// Load settings from environment variables
    pub fn load_from_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(width) = var("MDIALOG_DEFAULT_WIDTH") {
            self.default_width = width;
        }

        if let Some(timeout) = var("MDIALOG_READY_TIMEOUT_MS") {
            match timeout.parse() {
                Ok(timeout) => self.ready_timeout_ms = timeout,
                Err(_) => debug!("Ignoring invalid MDIALOG_READY_TIMEOUT_MS: {}", timeout),
            }
        }

        if let Some(latency) = var("MDIALOG_COMPONENT_LATENCY_MS") {
            match latency.parse() {
                Ok(latency) => self.component_latency_ms = latency,
                Err(_) => debug!("Ignoring invalid MDIALOG_COMPONENT_LATENCY_MS: {}", latency),
            }
        }
    }

    /// Load settings from mdialog.json files
    pub async fn load_from_file() -> Result<Self> {
        // 1. ./.mdialog.json
        // 2. ./mdialog.json
        // 3. $HOME/.config/mdialog/mdialog.json
        let mut config_paths = vec![
            PathBuf::from("./.mdialog.json"),
            PathBuf::from("./mdialog.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("mdialog").join("mdialog.json"));
        }

        for path in config_paths {
            if path.exists() {
                return Self::load_from_path(&path).await;
            }
        }

        Err(anyhow::anyhow!("No configuration file found"))
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading settings from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.default_width.trim().is_empty() {
            return Err(anyhow::anyhow!("default_width must not be empty"));
        }

        Ok(())
    }

    /// Style every dialog starts from before its own style is merged in.
    pub fn base_style(&self) -> StyleMap {
        StyleMap::width(self.default_width.clone())
    }

    pub fn ready_timeout(&self) -> Option<Duration> {
        (self.ready_timeout_ms > 0).then(|| Duration::from_millis(self.ready_timeout_ms))
    }

    pub fn component_latency(&self) -> Duration {
        Duration::from_millis(self.component_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.base_style().to_css().as_deref(), Some("width: 400px"));
        assert_eq!(settings.ready_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.component_latency(), Duration::ZERO);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let settings = Settings {
            ready_timeout_ms: 0,
            ..Settings::default()
        };
        assert_eq!(settings.ready_timeout(), None);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MDIALOG_DEFAULT_WIDTH", "560px"),
            ("MDIALOG_READY_TIMEOUT_MS", "250"),
            ("MDIALOG_COMPONENT_LATENCY_MS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.default_width, "560px");
        assert_eq!(settings.ready_timeout_ms, 250);
        assert_eq!(settings.component_latency_ms, 0);
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdialog.json");
        std::fs::write(&path, r#"{ "default_width": "90vw" }"#).unwrap();

        let settings = Settings::load_from_path(&path).await.unwrap();
        assert_eq!(settings.default_width, "90vw");
        assert_eq!(settings.ready_timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdialog.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Settings::load_from_path(&path).await.unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));
        assert!(Settings::load_from_path(&dir.path().join("missing.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_init_from_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{ "component_latency_ms": 5 }"#).unwrap();

        let settings = Settings::init_from(Some(&path)).await.unwrap();
        assert_eq!(settings.component_latency(), Duration::from_millis(5));

        std::fs::write(&path, r#"{ "default_width": "" }"#).unwrap();
        assert!(Settings::init_from(Some(&path)).await.is_err());
    }

    #[test]
    fn test_empty_width_rejected() {
        let settings = Settings {
            default_width: "  ".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
