//! Layered configuration for recap.
//!
//! Settings come from `recap.toml` in the project directory, then the
//! environment, then CLI flags, each layer overriding the one before.
//!
//! # Configuration File Format
//!
//! ```toml
//! [model]
//! name = "gpt-3.5-turbo"
//! base_url = "https://api.openai.com"
//! max_tokens = 150
//! temperature = 0.7
//! timeout_secs = 60
//!
//! [history]
//! base_history_length = 10
//! ```
//!
//! The API credential is only ever read from `OPENAI_API_KEY`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::compaction::{DEFAULT_BASE_HISTORY_LENGTH, parse_base_history_length};
use crate::completion::{API_KEY_ENV, OpenAiSettings};

/// File name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "recap.toml";

/// Overrides `[model] name`.
pub const MODEL_ENV: &str = "RECAP_MODEL";
/// Overrides `[model] base_url`.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
/// Overrides `[history] base_history_length`.
pub const BASE_HISTORY_LENGTH_ENV: &str = "RECAP_BASE_HISTORY_LENGTH";

/// Model and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// Model identifier used for replies, summaries and complexity scores
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Root of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Completion length cap per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_name() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            base_url: default_base_url(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// History retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySection {
    /// Minimum exchanges kept before compaction is considered
    #[serde(default = "default_base_history_length")]
    pub base_history_length: usize,
}

fn default_base_history_length() -> usize {
    DEFAULT_BASE_HISTORY_LENGTH
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            base_history_length: default_base_history_length(),
        }
    }
}

/// Contents of `recap.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecapToml {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub history: HistorySection,
}

impl RecapToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse recap.toml")
    }

    /// Load `recap.toml` from `project_dir`, or defaults if it is absent.
    pub fn load_or_default(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize recap.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.model.name.trim().is_empty() {
            warnings.push("Model name is empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.model.temperature) {
            warnings.push(format!(
                "Invalid temperature {}: should be between 0 and 2",
                self.model.temperature
            ));
        }
        if self.model.max_tokens == 0 {
            warnings.push("max_tokens is 0: every reply will be empty".to_string());
        }
        if self.model.timeout_secs == 0 {
            warnings.push("timeout_secs is 0: every request will time out".to_string());
        }
        if self.history.base_history_length == 0 {
            warnings.push("base_history_length must be at least 1".to_string());
        }

        warnings
    }
}

/// Configuration with environment and CLI overrides applied.
#[derive(Debug, Clone)]
pub struct RecapConfig {
    /// Directory holding `recap.toml`
    pub project_dir: PathBuf,
    /// Parsed file contents (defaults when absent)
    pub toml: RecapToml,
    /// CLI override for the model name
    pub cli_model: Option<String>,
    /// CLI override for the base history length
    pub cli_base_history_length: Option<usize>,
}

impl RecapConfig {
    /// Load configuration for a project directory.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let toml = RecapToml::load_or_default(&project_dir)?;
        Ok(Self {
            project_dir,
            toml,
            cli_model: None,
            cli_base_history_length: None,
        })
    }

    /// Load configuration with CLI overrides.
    pub fn with_cli_args(
        project_dir: PathBuf,
        model: Option<String>,
        base_history_length: Option<usize>,
    ) -> Result<Self> {
        let mut config = Self::new(project_dir)?;
        config.cli_model = model;
        config.cli_base_history_length = base_history_length;
        Ok(config)
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }

    /// Model name (CLI → env → file).
    pub fn model_name(&self) -> String {
        self.cli_model
            .clone()
            .or_else(|| non_empty_env(MODEL_ENV))
            .unwrap_or_else(|| self.toml.model.name.clone())
    }

    /// API root (env → file).
    pub fn base_url(&self) -> String {
        non_empty_env(BASE_URL_ENV).unwrap_or_else(|| self.toml.model.base_url.clone())
    }

    /// Credential from the environment, if set.
    pub fn api_key(&self) -> Option<String> {
        non_empty_env(API_KEY_ENV)
    }

    /// Base history length (CLI → env → file).
    pub fn base_history_length(&self) -> Result<usize> {
        if let Some(length) = self.cli_base_history_length {
            return Ok(length);
        }
        if let Some(raw) = non_empty_env(BASE_HISTORY_LENGTH_ENV) {
            return parse_base_history_length(&raw)
                .with_context(|| format!("Invalid {}", BASE_HISTORY_LENGTH_ENV));
        }
        Ok(self.toml.history.base_history_length)
    }

    /// Settings for the HTTP completion backend.
    pub fn openai_settings(&self) -> OpenAiSettings {
        OpenAiSettings {
            base_url: self.base_url(),
            api_key: self.api_key(),
            max_tokens: self.toml.model.max_tokens,
            temperature: self.toml.model.temperature,
            timeout: Duration::from_secs(self.toml.model.timeout_secs),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
