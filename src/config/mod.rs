//! Configuration management.
//!
//! This module handles:
//! - Loading the YAML settings file (API endpoints, prompt template, tool
//!   and agent metadata, model backend)
//! - Environment variable loading for runtime settings
//! - Configuration validation
//! - Secure API key storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use clinical_search::config::Config;
//!
//! let yaml = r#"
//! prompt:
//!   clinical_summary: "Question: {query}\nData: {api_data}"
//! "#;
//!
//! let config = Config::from_yaml_str(yaml).unwrap();
//! assert_eq!(config.nih_api.params.max_list, 10);
//! assert_eq!(config.request.timeout, 300);
//! ```

mod runtime;
mod secret;
mod validation;

pub use runtime::{
    LogFormat, RuntimeConfig, Transport, DEFAULT_BIND_ADDR, DEFAULT_CONFIG_PATH, DEFAULT_LOG_LEVEL,
};
pub use secret::SecretString;
pub use validation::{
    validate_config, validate_runtime, MAX_MAX_LIST, MAX_TEMPERATURE, MAX_TIMEOUT_SECS,
    MIN_TIMEOUT_SECS,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default NIH Clinical Tables conditions endpoint.
pub const DEFAULT_TERMINOLOGY_BASE_URL: &str =
    "https://clinicaltables.nlm.nih.gov/api/conditions/v3/search";

/// Default field selector: display name plus encoded ICD-10 codes.
pub const DEFAULT_FIELDS: &str = "primary_name,icd10cm";

/// Default cap on returned records.
pub const DEFAULT_MAX_LIST: u32 = 10;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Default chat model.
pub const DEFAULT_MODEL_ID: &str = "HuggingFaceH4/zephyr-7b-alpha";

/// Default chat-completions base URL for [`DEFAULT_MODEL_ID`].
pub const DEFAULT_MODEL_BASE_URL: &str =
    "https://api-inference.huggingface.co/models/HuggingFaceH4/zephyr-7b-alpha/v1";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Default completion length.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default tool name exposed to agent hosts.
pub const DEFAULT_TOOL_NAME: &str = "clinical_search";

/// Settings loaded from the YAML settings file.
///
/// Loaded once at startup with [`load_config`] and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Terminology lookup API.
    #[serde(default)]
    pub nih_api: TerminologyApiConfig,
    /// Outbound request settings.
    #[serde(default)]
    pub request: RequestConfig,
    /// Prompt templates.
    pub prompt: PromptConfig,
    /// Tool metadata advertised to agent hosts.
    #[serde(default)]
    pub tool: ToolMetadata,
    /// Agent persona used as the model's system prompt.
    #[serde(default)]
    pub agent: AgentMetadata,
    /// Task metadata advertised to agent hosts.
    #[serde(default)]
    pub task: TaskMetadata,
    /// Language-model backend.
    #[serde(default)]
    pub model: ModelConfig,
}

impl Config {
    /// Parse and validate settings from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid YAML for this
    /// layout, or [`ConfigError::InvalidValue`] if validation fails.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        parse_config(text, "<inline>")
    }
}

/// Terminology lookup API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyApiConfig {
    /// Search endpoint URL.
    pub base_url: String,
    /// Query parameter names and fixed values.
    pub params: TerminologyParams,
}

impl Default for TerminologyApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TERMINOLOGY_BASE_URL.to_string(),
            params: TerminologyParams::default(),
        }
    }
}

/// Query parameter names and the fixed values sent with every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyParams {
    /// Name of the search-term parameter.
    pub terms_param: String,
    /// Name of the field-selector parameter.
    pub fields_param: String,
    /// Name of the result-count parameter.
    pub max_list_param: String,
    /// Field selector value.
    #[serde(rename = "df")]
    pub fields: String,
    /// Result-count cap.
    #[serde(rename = "maxList")]
    pub max_list: u32,
}

impl Default for TerminologyParams {
    fn default() -> Self {
        Self {
            terms_param: "terms".to_string(),
            fields_param: "df".to_string(),
            max_list_param: "maxList".to_string(),
            fields: DEFAULT_FIELDS.to_string(),
            max_list: DEFAULT_MAX_LIST,
        }
    }
}

/// Outbound request settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Terminology request timeout in seconds.
    pub timeout: u64,
}

impl RequestConfig {
    /// Timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.saturating_mul(1000)
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Prompt templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Summary template with `{query}` and `{api_data}` placeholders.
    pub clinical_summary: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            clinical_summary: crate::prompts::DEFAULT_CLINICAL_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

/// Tool metadata advertised to agent hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolMetadata {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
}

impl Default for ToolMetadata {
    fn default() -> Self {
        Self {
            name: DEFAULT_TOOL_NAME.to_string(),
            description: "Look up a medical topic in the NIH clinical terminology tables and \
                          summarize the matching conditions and ICD-10 codes."
                .to_string(),
        }
    }
}

/// Agent persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentMetadata {
    /// Role the model plays.
    pub role: String,
    /// What the agent is trying to achieve.
    pub goal: String,
    /// Background given to the model.
    pub backstory: String,
}

impl Default for AgentMetadata {
    fn default() -> Self {
        Self {
            role: "Medical Research Assistant".to_string(),
            goal: "Provide accurate, well-sourced answers to medical questions".to_string(),
            backstory: "You are an experienced clinical researcher who explains standardized \
                        diagnostic terminology to non-specialists."
                .to_string(),
        }
    }
}

/// Task metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskMetadata {
    /// What the task asks for.
    pub description: String,
    /// Shape of the expected answer.
    pub expected_output: String,
}

impl Default for TaskMetadata {
    fn default() -> Self {
        Self {
            description: "Research the medical query using the clinical search tool.".to_string(),
            expected_output: "A concise clinical summary including relevant ICD-10 codes."
                .to_string(),
        }
    }
}

/// Language-model backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier sent with each request.
    pub id: String,
    /// Chat-completions base URL (without `/chat/completions`).
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Completion length cap.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl ModelConfig {
    /// Timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout.saturating_mul(1000)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_MODEL_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Load settings from a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read,
/// [`ConfigError::Parse`] if it is malformed, or
/// [`ConfigError::InvalidValue`] if a value fails validation.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    let text = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %shown, error = %e, "Failed to read configuration");
        ConfigError::Read {
            path: shown.clone(),
            message: e.to_string(),
        }
    })?;

    let config = parse_config(&text, &shown)?;
    tracing::info!(path = %shown, "Configuration loaded");
    Ok(config)
}

fn parse_config(text: &str, path: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(text).map_err(|e| {
        tracing::error!(path = %path, error = %e, "Failed to parse configuration");
        ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        }
    })?;

    validate_config(&config)?;
    Ok(config)
}
