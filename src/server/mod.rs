//! Server implementation.
//!
//! This module provides:
//! - HTTP endpoint (`POST /api/medical-query`, `GET /api/health`) on axum
//! - MCP tool server on rmcp, served over stdio
//! - Shared application state
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use clinical_search::config::load_config;
//! use clinical_search::search::DefaultClinicalSearch;
//! use clinical_search::server::{serve_http, AppState};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(load_config("medical_config.yaml")?);
//! let search = DefaultClinicalSearch::from_config(config, "hf_xxx")?;
//! serve_http(AppState::new(search.into_dyn()), "127.0.0.1:8000").await?;
//! # Ok(())
//! # }
//! ```

mod http;
mod mcp;
mod transport;
mod types;

pub use http::{router, HEALTH_PATH, MEDICAL_QUERY_PATH, REQUEST_ID_HEADER};
pub use mcp::{ClinicalSearchServer, SERVER_NAME};
pub use transport::{serve_http, serve_http_on, serve_stdio};
pub use types::{
    AppState, ErrorResponse, HealthResponse, MedicalQueryRequest, MedicalQueryResponse,
    EXAMPLE_QUERY, SUPPORT_CONTACT,
};
