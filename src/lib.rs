//! Clinical Search
//!
//! A medical question-answering service that grounds a hosted language
//! model in clinical terminology from the NIH Clinical Tables API.
//!
//! # Features
//!
//! - Condition lookup with ICD-10-CM codes
//! - Prompt rendering from a YAML-configured template
//! - Chat-completions model backend (Hugging Face compatible)
//! - JSON-over-HTTP endpoint and an MCP stdio tool
//! - Failures rendered as fixed-prefix strings, never raised to callers
//!
//! # Quick Start
//!
//! ```bash
//! HUGGINGFACE_API_KEY=hf_xxx ./clinical-search
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  POST /api/medical-query  ┌─────────────────┐
//! │   Client    │──────────────────────────▶│  ClinicalSearch │──────▶ NIH Clinical Tables
//! │ or MCP host │◀──────────────────────────│     (Rust)      │
//! └─────────────┘   JSON / stdio (MCP)      └────────┬────────┘
//!                                                    │
//!                                                    ▼
//!                                           Chat-completions model
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod clinical;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod prompts;
pub mod search;
pub mod server;
pub mod traits;

#[cfg(test)]
mod test_utils;
