//! Runtime settings from environment variables.

use std::str::FromStr;

use super::secret::SecretString;
use super::validation::validate_runtime;
use crate::error::ConfigError;

/// Default settings file path.
pub const DEFAULT_CONFIG_PATH: &str = "medical_config.yaml";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                var: "LOG_FORMAT".into(),
                reason: format!("expected `text` or `json`, got `{s}`"),
            }),
        }
    }
}

/// Inbound transport served by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    /// JSON-over-HTTP endpoint.
    #[default]
    Http,
    /// MCP over stdin/stdout.
    Stdio,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "stdio" | "mcp" => Ok(Self::Stdio),
            _ => Err(ConfigError::InvalidValue {
                var: "SERVER_TRANSPORT".into(),
                reason: format!("expected `http` or `stdio`, got `{s}`"),
            }),
        }
    }
}

/// Settings that come from the process environment rather than the
/// settings file.
///
/// The `api_key` field uses [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Model backend credential.
    pub api_key: SecretString,
    /// Path of the YAML settings file.
    pub config_path: String,
    /// Log level filter (error, warn, info, debug, trace).
    pub log_level: String,
    /// Log line format.
    pub log_format: LogFormat,
    /// Transport to serve.
    pub transport: Transport,
    /// HTTP bind address.
    pub bind_addr: String,
}

impl RuntimeConfig {
    /// Load runtime settings from environment variables.
    ///
    /// Required environment variables:
    /// - `HUGGINGFACE_API_KEY`: model backend credential
    ///
    /// Optional environment variables (with defaults):
    /// - `MEDICAL_CONFIG_PATH`: settings file (default: `medical_config.yaml`)
    /// - `LOG_LEVEL`: logging level (default: `info`)
    /// - `LOG_FORMAT`: `text` or `json` (default: `text`)
    /// - `SERVER_TRANSPORT`: `http` or `stdio` (default: `http`)
    /// - `BIND_ADDR`: HTTP listen address (default: `0.0.0.0:8000`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the credential is missing or any value is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("HUGGINGFACE_API_KEY").map_err(|_| ConfigError::MissingRequired {
                var: "HUGGINGFACE_API_KEY".into(),
            })?;

        let config_path =
            std::env::var("MEDICAL_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());
        let log_format = parse_env("LOG_FORMAT", LogFormat::default())?;
        let transport = parse_env("SERVER_TRANSPORT", Transport::default())?;
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        let config = Self {
            api_key: SecretString::new(api_key),
            config_path,
            log_level,
            log_format,
            transport,
            bind_addr,
        };

        validate_runtime(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable, using a default if not set.
fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    std::env::var(name).map_or(Ok(default), |val| val.parse())
}
