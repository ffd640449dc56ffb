//! Clinical search orchestration.
//!
//! [`ClinicalSearch`] runs one request through the pipeline:
//!
//! ```text
//! input ─▶ extract ─▶ fetch terms ─▶ render prompt ─▶ invoke model ─▶ text
//!             │             │                               │
//!             ▼             ▼                               ▼
//!      Validation Error  Clinical Data Error          System Error
//! ```
//!
//! Every failure becomes a [`SearchError`] whose `Display` carries a fixed
//! prefix, and [`ClinicalSearch::clinical_search`] always returns a string.

use std::sync::Arc;

use crate::clinical::ClinicalTablesClient;
use crate::config::Config;
use crate::error::{AppError, SearchError};
use crate::extract::{extract_query, QueryInput};
use crate::llm::{ChatClient, ClientConfig};
use crate::prompts::{agent_system_prompt, render_prompt};
use crate::traits::{ChatModelTrait, TerminologyClientTrait};

/// Pipeline wired to the production HTTP clients.
pub type DefaultClinicalSearch = ClinicalSearch<ClinicalTablesClient, ChatClient>;

/// Pipeline over type-erased clients.
pub type DynClinicalSearch =
    ClinicalSearch<Arc<dyn TerminologyClientTrait>, Arc<dyn ChatModelTrait>>;

/// The clinical search pipeline.
///
/// Holds no mutable state; one instance serves concurrent requests.
#[derive(Debug)]
pub struct ClinicalSearch<T, M> {
    terminology: T,
    model: M,
    config: Arc<Config>,
}

impl<T, M> ClinicalSearch<T, M>
where
    T: TerminologyClientTrait,
    M: ChatModelTrait,
{
    /// Create a pipeline from its parts.
    #[must_use]
    pub const fn new(terminology: T, model: M, config: Arc<Config>) -> Self {
        Self {
            terminology,
            model,
            config,
        }
    }

    /// Settings this pipeline was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the settings, for callers that outlive a borrow.
    #[must_use]
    pub fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Run the pipeline, returning the model's text or a typed failure.
    ///
    /// # Errors
    ///
    /// - [`SearchError::EmptyQuery`] if no usable query was supplied
    /// - [`SearchError::ClinicalData`] if the terminology lookup failed
    /// - [`SearchError::Model`] if the model call failed
    pub async fn search(&self, input: &QueryInput) -> Result<String, SearchError> {
        let query = extract_query(input);
        if query.is_empty() {
            tracing::warn!("Empty medical query");
            return Err(SearchError::EmptyQuery);
        }

        tracing::info!(query = %query, "Processing medical query");

        let result = self.terminology.fetch_terms(&query).await.map_err(|e| {
            tracing::error!(error = %e, "Clinical data fetch failed");
            SearchError::from(e)
        })?;
        tracing::debug!(api_data = %result.to_json(), "Clinical data response");

        let prompt = render_prompt(&query, &result, &self.config.prompt.clinical_summary);
        tracing::debug!(prompt_len = prompt.len(), "Prompt rendered");

        let text = self.model.invoke(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Model invocation failed");
            SearchError::from(e)
        })?;

        tracing::info!(response_len = text.len(), "Clinical search completed");
        Ok(text)
    }

    /// Run the pipeline and render the outcome as the caller-visible string.
    ///
    /// Failures come back prefixed with `Validation Error:`,
    /// `Clinical Data Error:` or `System Error:`.
    pub async fn clinical_search(&self, input: impl Into<QueryInput> + Send) -> String {
        let input = input.into();
        match self.search(&input).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }
}

impl DefaultClinicalSearch {
    /// Build the production pipeline from settings and the model credential.
    ///
    /// The agent persona becomes the model's system message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if either HTTP client cannot be built.
    pub fn from_config(config: Arc<Config>, api_key: &str) -> Result<Self, AppError> {
        let terminology = ClinicalTablesClient::new(config.nih_api.clone(), config.request)?;
        let client_config = ClientConfig::from_model_config(&config.model)
            .with_system_prompt(agent_system_prompt(&config.agent));
        let model = ChatClient::new(api_key, client_config)?;
        Ok(Self::new(terminology, model, config))
    }

    /// Erase the client types.
    #[must_use]
    pub fn into_dyn(self) -> DynClinicalSearch {
        ClinicalSearch::new(
            Arc::new(self.terminology) as Arc<dyn TerminologyClientTrait>,
            Arc::new(self.model) as Arc<dyn ChatModelTrait>,
            self.config,
        )
    }
}
