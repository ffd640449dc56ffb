//! Clinical terminology lookup.
//!
//! This module provides:
//! - [`ClinicalTablesClient`]: HTTP client for the NIH Clinical Tables search API
//! - [`normalize_response`]: pure conversion of the positional response into
//!   a [`ClinicalSearchResult`]
//! - Result types shared with the prompt assembler
//!
//! # Example
//!
//! ```
//! use clinical_search::clinical::normalize_response;
//! use serde_json::json;
//!
//! let body = json!([1, ["2182"], null, [["Kidney failure", "{\"code\": \"N19\"}"]]]);
//! let result = normalize_response(&body).unwrap();
//! assert_eq!(result.entries[0].icd10_codes, vec!["N19"]);
//! ```

mod client;
pub mod normalize;
mod types;

pub use client::ClinicalTablesClient;
pub use normalize::normalize_response;
pub use types::{ClinicalSearchResult, ClinicalTermEntry};
