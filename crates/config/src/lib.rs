//! Configuration loading, validation, and management for footmatch.
//!
//! Loads configuration from `footmatch.toml` (or an explicit path) with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "footmatch.toml";

/// The root configuration structure.
///
/// Maps directly to `footmatch.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the chat-completion backend. Absent ⇒ echo transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name (selects the default base URL)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Minimum seconds between the starts of two LLM calls
    #[serde(default = "default_request_interval")]
    pub request_interval: f64,

    /// HTTP timeout for one LLM call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Where raw prompts and responses are written (cleared at startup)
    #[serde(default = "default_responses_dir")]
    pub responses_dir: PathBuf,

    /// Status snapshot file
    #[serde(default = "default_status_path")]
    pub status_path: PathBuf,

    /// Log file (in addition to stderr)
    #[serde(default = "default_log_file", skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Match report destination
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Input documents
    #[serde(default)]
    pub input: InputConfig,

    /// Instruction template overrides
    #[serde(default)]
    pub prompts: PromptConfig,

    /// Repeated-call verification
    #[serde(default)]
    pub verification: VerificationConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_temperature() -> f32 {
    0.0
}
fn default_request_interval() -> f64 {
    1.0
}
fn default_request_timeout() -> u64 {
    120
}
fn default_responses_dir() -> PathBuf {
    PathBuf::from("responses")
}
fn default_status_path() -> PathBuf {
    PathBuf::from("status.json")
}
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("footmatch.log"))
}
fn default_output_path() -> PathBuf {
    PathBuf::from("matches.json")
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_interval", &self.request_interval)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("responses_dir", &self.responses_dir)
            .field("status_path", &self.status_path)
            .field("log_file", &self.log_file)
            .field("output_path", &self.output_path)
            .field("input", &self.input)
            .field("prompts", &self.prompts)
            .field("verification", &self.verification)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_literature_path")]
    pub literature: PathBuf,

    #[serde(default = "default_footnotes_path")]
    pub footnotes: PathBuf,

    /// Tag name of the citation elements in the footnote document
    #[serde(default = "default_footnote_tag")]
    pub footnote_tag: String,
}

fn default_literature_path() -> PathBuf {
    PathBuf::from("data/literature.json")
}
fn default_footnotes_path() -> PathBuf {
    PathBuf::from("data/footnotes.html")
}
fn default_footnote_tag() -> String {
    "div".into()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            literature: default_literature_path(),
            footnotes: default_footnotes_path(),
            footnote_tag: default_footnote_tag(),
        }
    }
}

/// Paths to instruction templates. Unset ⇒ built-in text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_template: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguation_template: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStrategy {
    /// Every call of an attempt must return the same JSON value
    Unanimous,
    /// The most frequent JSON value wins if it reaches the quorum
    Majority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    #[serde(default = "default_strategy")]
    pub strategy: VerificationStrategy,

    /// Identical prompts sent per attempt
    #[serde(default = "default_calls")]
    pub calls: usize,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Votes needed under `majority` (default: more than half of `calls`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quorum: Option<usize>,
}

fn default_strategy() -> VerificationStrategy {
    VerificationStrategy::Unanimous
}
fn default_calls() -> usize {
    2
}
fn default_max_attempts() -> usize {
    2
}

impl VerificationConfig {
    /// The effective quorum for majority voting.
    pub fn effective_quorum(&self) -> usize {
        self.quorum.unwrap_or(self.calls / 2 + 1)
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            calls: default_calls(),
            max_attempts: default_max_attempts(),
            quorum: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or `footmatch.toml` when `None`.
    ///
    /// Environment variables override file values:
    /// - `FOOTMATCH_API_KEY`, then `OPENAI_API_KEY` (only if no key is configured)
    /// - `FOOTMATCH_PROVIDER`
    /// - `FOOTMATCH_MODEL`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        let mut config = Self::load_from(&path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = lookup("FOOTMATCH_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("FOOTMATCH_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("FOOTMATCH_MODEL") {
            self.model = model;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !self.request_interval.is_finite() || self.request_interval < 0.0 {
            return Err(ConfigError::ValidationError(
                "request_interval must be a non-negative number of seconds".into(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError("max_tokens must be > 0".into()));
        }

        let v = &self.verification;
        if v.calls == 0 || v.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "verification.calls and verification.max_attempts must be > 0".into(),
            ));
        }

        if v.strategy == VerificationStrategy::Majority {
            let quorum = v.effective_quorum();
            if quorum == 0 || quorum > v.calls {
                return Err(ConfigError::ValidationError(format!(
                    "verification.quorum must be between 1 and {}",
                    v.calls
                )));
            }
        }

        if self.input.footnote_tag.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "input.footnote_tag must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured spacing between LLM calls.
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(self.request_interval.max(0.0))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_interval: default_request_interval(),
            request_timeout_secs: default_request_timeout(),
            responses_dir: default_responses_dir(),
            status_path: default_status_path(),
            log_file: default_log_file(),
            output_path: default_output_path(),
            input: InputConfig::default(),
            prompts: PromptConfig::default(),
            verification: VerificationConfig::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
