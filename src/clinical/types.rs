//! Normalized terminology lookup results.

use serde::{Deserialize, Serialize};

/// One condition matched by the terminology API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalTermEntry {
    /// Display name of the condition.
    pub primary_name: String,
    /// ICD-10 codes attached to the condition. Always a list, possibly empty.
    pub icd10_codes: Vec<String>,
}

impl ClinicalTermEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(primary_name: impl Into<String>, icd10_codes: Vec<String>) -> Self {
        Self {
            primary_name: primary_name.into(),
            icd10_codes,
        }
    }
}

/// Successful terminology lookup.
///
/// Serializes as `{"count": N, "results": [...]}`, the shape embedded in
/// the model prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalSearchResult {
    /// Total matches reported upstream. May exceed `entries.len()` when the
    /// result-count cap truncated the list.
    pub count: u64,
    /// Returned records, in upstream order.
    #[serde(rename = "results")]
    pub entries: Vec<ClinicalTermEntry>,
}

impl ClinicalSearchResult {
    /// Create a new result.
    #[must_use]
    pub const fn new(count: u64, entries: Vec<ClinicalTermEntry>) -> Self {
        Self { count, entries }
    }

    /// Canonical compact JSON form.
    ///
    /// Serialization of these plain structs cannot fail; an empty object is
    /// returned if it ever does.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}
