//! Configuration validation.
//!
//! Range and presence checks for the settings file and the runtime
//! environment. Both run once at startup.

use super::{Config, RuntimeConfig};
use crate::error::ConfigError;
use crate::prompts::uses_placeholder;

/// Minimum allowed timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Maximum allowed timeout in seconds (5 minutes).
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Maximum allowed result-count cap.
pub const MAX_MAX_LIST: u32 = 500;

/// Maximum allowed sampling temperature.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Validate settings file values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the offending key if:
/// - a base URL or the tool name is empty
/// - a timeout is outside 1..=300 seconds
/// - `maxList` is outside 1..=500
/// - the temperature is outside 0.0..=2.0
/// - the summary template is missing `{query}` or `{api_data}`
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    require_non_empty("nih_api.base_url", &config.nih_api.base_url)?;
    require_non_empty("nih_api.params.terms_param", &config.nih_api.params.terms_param)?;
    require_non_empty("model.base_url", &config.model.base_url)?;
    require_non_empty("model.id", &config.model.id)?;
    require_non_empty("tool.name", &config.tool.name)?;

    check_timeout("request.timeout", config.request.timeout)?;
    check_timeout("model.timeout", config.model.timeout)?;

    let max_list = config.nih_api.params.max_list;
    if max_list == 0 || max_list > MAX_MAX_LIST {
        return Err(ConfigError::InvalidValue {
            var: "nih_api.params.maxList".into(),
            reason: format!("must be between 1 and {MAX_MAX_LIST}"),
        });
    }

    let temperature = config.model.temperature;
    if !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(ConfigError::InvalidValue {
            var: "model.temperature".into(),
            reason: format!("must be between 0.0 and {MAX_TEMPERATURE}"),
        });
    }

    let template = &config.prompt.clinical_summary;
    for placeholder in ["query", "api_data"] {
        if !uses_placeholder(template, placeholder) {
            return Err(ConfigError::InvalidValue {
                var: "prompt.clinical_summary".into(),
                reason: format!("must contain the {{{placeholder}}} placeholder"),
            });
        }
    }

    Ok(())
}

/// Validate runtime environment values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the credential or bind address
/// is empty.
pub fn validate_runtime(config: &RuntimeConfig) -> Result<(), ConfigError> {
    if config.api_key.is_blank() {
        return Err(ConfigError::InvalidValue {
            var: "HUGGINGFACE_API_KEY".into(),
            reason: "must not be empty".into(),
        });
    }

    require_non_empty("BIND_ADDR", &config.bind_addr)?;
    require_non_empty("MEDICAL_CONFIG_PATH", &config.config_path)
}

fn require_non_empty(var: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

fn check_timeout(var: &str, secs: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::InvalidValue {
            var: var.into(),
            reason: format!("must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds"),
        });
    }
    Ok(())
}
