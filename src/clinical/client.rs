//! NIH Clinical Tables HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use super::normalize::normalize_response;
use super::types::ClinicalSearchResult;
use crate::config::{RequestConfig, TerminologyApiConfig};
use crate::error::ClinicalDataError;
use crate::traits::TerminologyClientTrait;

/// Clinical Tables search client.
///
/// Sends one GET per lookup, bounded by the configured timeout. No retries.
#[derive(Debug, Clone)]
pub struct ClinicalTablesClient {
    client: Client,
    api: TerminologyApiConfig,
    timeout_ms: u64,
}

impl ClinicalTablesClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicalDataError::RequestFailed`] if the HTTP client cannot
    /// be built.
    pub fn new(
        api: TerminologyApiConfig,
        request: RequestConfig,
    ) -> Result<Self, ClinicalDataError> {
        let timeout_ms = request.timeout_ms();
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ClinicalDataError::RequestFailed {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api,
            timeout_ms,
        })
    }

    /// Get the search endpoint.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// Build the lookup URL for a query.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicalDataError::RequestFailed`] if the base URL is invalid.
    pub fn search_url(&self, query: &str) -> Result<Url, ClinicalDataError> {
        let params = &self.api.params;
        let max_list = params.max_list.to_string();
        Url::parse_with_params(
            &self.api.base_url,
            [
                (params.terms_param.as_str(), query),
                (params.fields_param.as_str(), params.fields.as_str()),
                (params.max_list_param.as_str(), max_list.as_str()),
            ],
        )
        .map_err(|e| ClinicalDataError::RequestFailed {
            message: format!("Invalid base URL {}: {e}", self.api.base_url),
        })
    }

    async fn fetch_body(&self, query: &str) -> Result<Value, ClinicalDataError> {
        let url = self.search_url(query)?;
        let start = std::time::Instant::now();

        tracing::debug!(
            url = %url,
            timeout_ms = self.timeout_ms,
            "Starting clinical terms request"
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if e.is_timeout() {
                tracing::error!(
                    elapsed_ms,
                    timeout_ms = self.timeout_ms,
                    "Clinical terms request timed out"
                );
                ClinicalDataError::Timeout
            } else {
                tracing::error!(elapsed_ms, error = %e, "Clinical terms request failed");
                ClinicalDataError::RequestFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Clinical terms response received"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClinicalDataError::RequestFailed {
                message: format!("Status {status}: {body}"),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                ClinicalDataError::Timeout
            } else {
                ClinicalDataError::RequestFailed {
                    message: format!("Failed to decode response: {e}"),
                }
            }
        })
    }
}

#[async_trait]
impl TerminologyClientTrait for ClinicalTablesClient {
    async fn fetch_terms(&self, query: &str) -> Result<ClinicalSearchResult, ClinicalDataError> {
        let body = self.fetch_body(query).await?;
        let result = normalize_response(&body)?;
        tracing::info!(
            count = result.count,
            returned = result.entries.len(),
            "Found clinical results"
        );
        Ok(result)
    }
}
