//! Server types and shared state.
//!
//! This module defines the application state shared by both transports and
//! the JSON bodies of the HTTP endpoint.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::search::DynClinicalSearch;

/// Example query shown to callers who send a malformed request.
pub const EXAMPLE_QUERY: &str = "What is dialysis?";

/// Support contact returned with processing failures.
pub const SUPPORT_CONTACT: &str = "contact support@medicalai.com";

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The clinical search pipeline.
    pub search: Arc<DynClinicalSearch>,
    /// Loaded settings.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(search: DynClinicalSearch) -> Self {
        let config = search.shared_config();
        Self {
            search: Arc::new(search),
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/medical-query`, and the MCP tool's input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MedicalQueryRequest {
    /// Natural-language medical question or term, e.g. "What is dialysis?".
    pub query: String,
}

/// Successful endpoint reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalQueryResponse {
    /// The query as received.
    pub query: String,
    /// Pipeline output, error-prefixed strings included.
    pub response: String,
}

/// Error reply for 400 and 500 outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error category.
    pub error: String,
    /// What went wrong.
    pub details: String,
    /// A well-formed request body (400 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<MedicalQueryRequest>,
    /// Who to contact (500 only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
}

impl ErrorResponse {
    /// Body for a request that could not be parsed.
    #[must_use]
    pub fn invalid_request(details: impl Into<String>) -> Self {
        Self {
            error: "Invalid request format".to_string(),
            details: details.into(),
            example: Some(MedicalQueryRequest {
                query: EXAMPLE_QUERY.to_string(),
            }),
            support: None,
        }
    }

    /// Body for a pipeline task that failed unexpectedly.
    #[must_use]
    pub fn processing_failed(details: impl Into<String>) -> Self {
        Self {
            error: "Processing failed".to_string(),
            details: details.into(),
            example: None,
            support: Some(SUPPORT_CONTACT.to_string()),
        }
    }
}

/// Reply of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving.
    pub status: String,
    /// Crate version.
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
