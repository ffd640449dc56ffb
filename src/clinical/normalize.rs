//! Normalization of raw Clinical Tables responses.
//!
//! The search endpoint answers with a positional JSON array:
//!
//! ```text
//! [total_count, [codes...], extra_fields_or_null, [[display fields...], ...]]
//! ```
//!
//! Element 0 is the upstream match count and element 3 holds one record per
//! match, laid out in field-selector order (`primary_name,icd10cm`). The
//! ICD-10 field arrives in several shapes: missing, a JSON-encoded object, a
//! JSON-encoded list of objects, or already-decoded JSON. A record whose code
//! field cannot be read keeps its name with an empty code list, a record
//! whose name cannot be read keeps its codes with an empty name, and a
//! record that is not an array is skipped. Only a broken top-level layout
//! fails the whole lookup.

use serde_json::Value;

use super::types::{ClinicalSearchResult, ClinicalTermEntry};
use crate::error::ClinicalDataError;

const COUNT_INDEX: usize = 0;
const RECORDS_INDEX: usize = 3;
const NAME_FIELD: usize = 0;
const CODES_FIELD: usize = 1;

/// Normalize a decoded response body into a search result.
///
/// # Errors
///
/// - [`ClinicalDataError::NoData`] if the upstream count is zero
/// - [`ClinicalDataError::Processing`] if the top-level layout is wrong
pub fn normalize_response(body: &Value) -> Result<ClinicalSearchResult, ClinicalDataError> {
    let data = body
        .as_array()
        .ok_or_else(|| processing("response is not an array"))?;

    let count = data
        .get(COUNT_INDEX)
        .and_then(Value::as_u64)
        .ok_or_else(|| processing("match count is missing or not a non-negative integer"))?;

    if count == 0 {
        return Err(ClinicalDataError::NoData);
    }

    let records = data
        .get(RECORDS_INDEX)
        .and_then(Value::as_array)
        .ok_or_else(|| processing("record list is missing or not an array"))?;

    let entries = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_record(index, record))
        .collect();

    Ok(ClinicalSearchResult::new(count, entries))
}

fn normalize_record(index: usize, record: &Value) -> Option<ClinicalTermEntry> {
    let Some(fields) = record.as_array() else {
        tracing::warn!(
            record = index,
            kind = type_name(record),
            "Record is not an array, skipping"
        );
        return None;
    };

    let primary_name = match fields.get(NAME_FIELD) {
        Some(Value::String(name)) => name.clone(),
        Some(Value::Number(name)) => name.to_string(),
        other => {
            tracing::warn!(
                record = index,
                kind = other.map_or("missing", type_name),
                "Unreadable primary name, using empty name"
            );
            String::new()
        }
    };

    let icd10_codes = match fields.get(CODES_FIELD) {
        None => Vec::new(),
        Some(raw) => parse_codes(raw).unwrap_or_else(|reason| {
            tracing::warn!(
                record = index,
                primary_name = %primary_name,
                reason = %reason,
                "Unreadable ICD-10 field, using empty code list"
            );
            Vec::new()
        }),
    };

    Some(ClinicalTermEntry::new(primary_name, icd10_codes))
}

/// Parse one ICD-10 field. `Err` carries the reason it was unreadable.
fn parse_codes(raw: &Value) -> Result<Vec<String>, String> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => {
            let decoded: Value =
                serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
            codes_from_decoded(&decoded)
        }
        decoded @ (Value::Object(_) | Value::Array(_)) => codes_from_decoded(decoded),
        other => Err(format!("unexpected {} value", type_name(other))),
    }
}

fn codes_from_decoded(decoded: &Value) -> Result<Vec<String>, String> {
    match decoded {
        Value::Null => Ok(Vec::new()),
        Value::Object(_) => Ok(vec![code_of(decoded)?]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                if item.is_object() {
                    code_of(item)
                } else {
                    Err(format!("list member is {}", type_name(item)))
                }
            })
            .collect(),
        other => Err(format!("decoded to {}", type_name(other))),
    }
}

fn code_of(entry: &Value) -> Result<String, String> {
    match entry.get("code") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(code)) => Ok(code.clone()),
        Some(Value::Number(code)) => Ok(code.to_string()),
        Some(other) => Err(format!("code is {}", type_name(other))),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn processing(message: impl Into<String>) -> ClinicalDataError {
    ClinicalDataError::Processing {
        message: message.into(),
    }
}
