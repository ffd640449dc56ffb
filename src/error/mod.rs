//! Error types for the clinical search service.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`ConfigError`]: Configuration loading and validation errors
//! - [`ClinicalDataError`]: Terminology API lookup errors
//! - [`ModelError`]: Language-model backend errors
//! - [`SearchError`]: Pipeline outcome errors, rendered with caller-visible prefixes
//!
//! All errors implement `Send + Sync` for async compatibility.

use thiserror::Error;

/// Prefix for input validation failures.
pub const VALIDATION_ERROR_PREFIX: &str = "Validation Error:";

/// Prefix for terminology lookup failures.
pub const CLINICAL_DATA_ERROR_PREFIX: &str = "Clinical Data Error:";

/// Prefix for model backend failures.
pub const SYSTEM_ERROR_PREFIX: &str = "System Error:";

/// Top-level application error.
///
/// Only returned from startup and transport code; the search pipeline
/// itself never fails outward.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Model client construction error.
    #[error("Model client error: {0}")]
    Model(#[from] ModelError),

    /// Terminology client construction error.
    #[error("Terminology client error: {0}")]
    ClinicalData(#[from] ClinicalDataError),

    /// Server transport error.
    #[error("Server error: {message}")]
    Server {
        /// Description of the server failure.
        message: String,
    },
}

/// Configuration errors.
///
/// These errors are fatal: the binary exits when any of them is returned
/// during startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("Failed to read {path}: {message}")]
    Read {
        /// Path of the settings file.
        path: String,
        /// Underlying IO error.
        message: String,
    },

    /// The settings file is not valid YAML for the expected layout.
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// Path of the settings file.
        path: String,
        /// Underlying parse error.
        message: String,
    },

    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Terminology API errors.
///
/// The display strings are part of the caller-visible contract and appear
/// verbatim after the `Clinical Data Error:` prefix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClinicalDataError {
    /// The request exceeded the configured timeout.
    #[error("API request timed out")]
    Timeout,

    /// Transport failure, non-success status, or undecodable body.
    #[error("API request failed: {message}")]
    RequestFailed {
        /// Description of the failure.
        message: String,
    },

    /// The API reported zero matches.
    #[error("No clinical data found")]
    NoData,

    /// The response did not have the expected top-level structure.
    #[error("Failed to process clinical data: {message}")]
    Processing {
        /// Description of the structural problem.
        message: String,
    },
}

/// Language-model backend errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Authentication failed due to a missing or invalid credential.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Request was rate limited.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Seconds the backend asked us to wait.
        retry_after_seconds: u64,
    },

    /// The model is loading or otherwise unavailable.
    #[error("Model unavailable: {model}")]
    ModelUnavailable {
        /// The model that is unavailable.
        model: String,
    },

    /// Request timed out.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },

    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// Unexpected response from the backend.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Description of what was unexpected.
        message: String,
    },
}

/// Classification of a failed search, independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchErrorKind {
    /// The caller did not supply a usable query.
    Validation,
    /// The terminology lookup failed.
    ClinicalData,
    /// The model backend failed.
    System,
}

impl SearchErrorKind {
    /// Returns the literal prefix rendered for this kind.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Validation => VALIDATION_ERROR_PREFIX,
            Self::ClinicalData => CLINICAL_DATA_ERROR_PREFIX,
            Self::System => SYSTEM_ERROR_PREFIX,
        }
    }

    /// Classifies a rendered pipeline output by its prefix.
    ///
    /// Returns `None` for successful (unprefixed) outputs.
    #[must_use]
    pub fn classify(output: &str) -> Option<Self> {
        [Self::Validation, Self::ClinicalData, Self::System]
            .into_iter()
            .find(|kind| output.starts_with(kind.prefix()))
    }
}

/// Failure of one clinical search run.
///
/// `Display` renders the caller-visible string, prefix included.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The extracted query was empty.
    #[error("Validation Error: Empty medical query")]
    EmptyQuery,

    /// The terminology lookup failed.
    #[error("Clinical Data Error: {0}")]
    ClinicalData(#[from] ClinicalDataError),

    /// The model invocation failed.
    #[error("System Error: Clinical search unavailable - {0}")]
    Model(#[from] ModelError),
}

impl SearchError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> SearchErrorKind {
        match self {
            Self::EmptyQuery => SearchErrorKind::Validation,
            Self::ClinicalData(_) => SearchErrorKind::ClinicalData,
            Self::Model(_) => SearchErrorKind::System,
        }
    }
}
