//! Prompt templates.
//!
//! This module renders the summary prompt sent to the language model and the
//! agent persona used as its system message.
//!
//! Templates use brace placeholders:
//! - `{query}`: the extracted medical query
//! - `{api_data}`: the lookup result as compact JSON
//! - `{{` and `}}`: literal braces
//!
//! Unknown placeholders are copied through unchanged, and substituted values
//! are never re-scanned, so a query containing `{api_data}` stays literal.
//!
//! # Example
//!
//! ```
//! use clinical_search::clinical::ClinicalSearchResult;
//! use clinical_search::prompts::render_prompt;
//!
//! let result = ClinicalSearchResult::new(0, Vec::new());
//! let prompt = render_prompt("gout", &result, "Q: {query} D: {api_data} {{ok}}");
//! assert_eq!(prompt, r#"Q: gout D: {"count":0,"results":[]} {ok}"#);
//! ```

use crate::clinical::ClinicalSearchResult;
use crate::config::AgentMetadata;

/// Fallback summary template.
pub const DEFAULT_CLINICAL_SUMMARY_TEMPLATE: &str = r"You are assisting with a medical question.

Question: {query}

Matching conditions from the NIH Clinical Tables terminology service, as JSON
({{count}} is the total number of matches, {{results}} lists each condition with its ICD-10 codes):
{api_data}

Using only the data above plus well-established medical knowledge, write a concise answer to
the question. Name the most relevant conditions and cite their ICD-10 codes. If the data does
not cover the question, say so. Do not give personal medical advice.";

const QUERY_PLACEHOLDER: &str = "query";
const API_DATA_PLACEHOLDER: &str = "api_data";

/// Render the summary prompt for one query.
#[must_use]
pub fn render_prompt(query: &str, result: &ClinicalSearchResult, template: &str) -> String {
    let api_data = result.to_json();
    substitute(template, &[(QUERY_PLACEHOLDER, query), (API_DATA_PLACEHOLDER, &api_data)])
}

/// Render the agent persona as a system message.
#[must_use]
pub fn agent_system_prompt(agent: &AgentMetadata) -> String {
    let mut prompt = format!("You are a {}.", agent.role.trim().trim_end_matches('.'));
    for part in [&agent.goal, &agent.backstory] {
        let part = part.trim();
        if !part.is_empty() {
            prompt.push(' ');
            prompt.push_str(part);
            if !part.ends_with(['.', '!', '?']) {
                prompt.push('.');
            }
        }
    }
    prompt
}

/// Whether `template` has an unescaped `{name}` that rendering would fill.
#[must_use]
pub fn uses_placeholder(template: &str, name: &str) -> bool {
    substitute(template, &[(name, "")]) != substitute(template, &[(name, "\u{0}")])
}

/// Single left-to-right pass over `template`.
fn substitute(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
        } else {
            // Single `{`: look for a known `{name}`.
            let known = tail[1..].find('}').and_then(|end| {
                let name = &tail[1..=end];
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| (*value, end + 2))
            });
            match known {
                Some((value, consumed)) => {
                    out.push_str(value);
                    rest = &tail[consumed..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
    }

    out.push_str(rest);
    out
}
