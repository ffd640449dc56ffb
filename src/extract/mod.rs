//! Query extraction from loosely-structured caller input.
//!
//! Agent hosts hand the clinical search tool its arguments in several shapes:
//! a plain query string, a JSON-encoded argument object, an already-decoded
//! mapping (sometimes wrapped one level deep), or something else entirely.
//! [`extract_query`] reduces all of them to a trimmed query string. It is
//! total: unusable input yields the empty string, never an error or panic.
//!
//! # Example
//!
//! ```
//! use clinical_search::extract::{extract_query, QueryInput};
//! use serde_json::json;
//!
//! assert_eq!(extract_query(&QueryInput::from("  dialysis ")), "dialysis");
//!
//! let nested = QueryInput::from_tool_args(json!({"query": {"query": "asthma"}}));
//! assert_eq!(extract_query(&nested), "asthma");
//!
//! let garbage = QueryInput::from_tool_args(json!("not json"));
//! assert_eq!(extract_query(&garbage), "");
//! ```

use serde_json::{Map, Value};

/// Key holding the query in tool arguments.
pub const QUERY_KEY: &str = "query";

/// Caller input to the clinical search pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// The query itself, supplied directly.
    Query(String),
    /// A JSON-encoded tool-argument object.
    Encoded(String),
    /// Decoded tool arguments.
    Mapping(Map<String, Value>),
    /// Any other structured value. Never yields a query.
    Other(Value),
}

impl QueryInput {
    /// Classifies raw tool arguments.
    ///
    /// A JSON string is treated as encoded arguments, an object as decoded
    /// arguments, and anything else as [`QueryInput::Other`].
    #[must_use]
    pub fn from_tool_args(args: Value) -> Self {
        match args {
            Value::String(text) => Self::Encoded(text),
            Value::Object(map) => Self::Mapping(map),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for QueryInput {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<Map<String, Value>> for QueryInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

/// Extracts the trimmed query string from caller input.
///
/// Returns the empty string when no usable query is present.
#[must_use]
pub fn extract_query(input: &QueryInput) -> String {
    let raw = match input {
        QueryInput::Query(query) => query.clone(),
        QueryInput::Encoded(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => from_mapping(&map),
            Ok(_) => String::new(),
            Err(e) => {
                tracing::debug!(error = %e, "Tool arguments are not valid JSON");
                String::new()
            }
        },
        QueryInput::Mapping(map) => from_mapping(map),
        QueryInput::Other(_) => String::new(),
    };
    raw.trim().to_string()
}

fn from_mapping(map: &Map<String, Value>) -> String {
    match map.get(QUERY_KEY) {
        // One level of wrapping only: {"query": {"query": ...}}
        Some(Value::Object(inner)) => inner.get(QUERY_KEY).map_or_else(String::new, coerce),
        Some(value) => coerce(value),
        None => String::new(),
    }
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
