//! Configuration types for the tinychat engine.
//!
//! The endpoint, model identifier and optional request timeout are injected
//! through [`Config`] rather than compiled in.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Directory holding per-project tinychat files.
pub const CONFIG_DIR: &str = ".tinychat";

/// File name of the config inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Path of the chat endpoint relative to the base URL.
pub const CHAT_PATH: &str = "/chat";

/// Main configuration for tinychat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Endpoint to call (scheme, host and port, no path).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional request timeout in milliseconds. `None` waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    "http://192.168.1.50:5000".into()
}

fn default_model() -> String {
    "tinyllama".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Default config location relative to `root`.
    pub fn default_path(root: &Path) -> std::path::PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Check that the values are usable for a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base URL {:?}: scheme must be http or https",
                self.base_url
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url.trim_end_matches('/'))
    }

    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A value is present but unusable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
