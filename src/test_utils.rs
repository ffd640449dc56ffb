//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock factories for the client traits
//! - Settings and result fixtures
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use crate::clinical::{ClinicalSearchResult, ClinicalTermEntry};
use crate::config::Config;
use crate::error::{ClinicalDataError, ModelError};
use crate::search::DynClinicalSearch;
use crate::traits::{
    ChatModelTrait, MockChatModelTrait, MockTerminologyClientTrait, TerminologyClientTrait,
};

/// Settings with defaults and a short, recognizable template.
#[must_use]
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.prompt.clinical_summary = "Question: {query}\nData: {api_data}".to_string();
    config.request.timeout = 5;
    config.model.timeout = 5;
    config
}

/// A one-record lookup result for "dialysis".
#[must_use]
pub fn dialysis_result() -> ClinicalSearchResult {
    ClinicalSearchResult::new(
        1,
        vec![ClinicalTermEntry::new("Kidney failure", vec!["N19".to_string()])],
    )
}

/// Create a mock terminology client that always returns `result`.
#[must_use]
pub fn mock_terminology_success(result: ClinicalSearchResult) -> MockTerminologyClientTrait {
    let mut mock = MockTerminologyClientTrait::new();
    mock.expect_fetch_terms()
        .returning(move |_| Ok(result.clone()));
    mock
}

/// Create a mock terminology client that always fails with `error`.
#[must_use]
pub fn mock_terminology_error(error: ClinicalDataError) -> MockTerminologyClientTrait {
    let mut mock = MockTerminologyClientTrait::new();
    mock.expect_fetch_terms()
        .returning(move |_| Err(error.clone()));
    mock
}

/// Create a mock model that always replies with `text`.
#[must_use]
pub fn mock_model_success(text: impl Into<String>) -> MockChatModelTrait {
    let text = text.into();
    let mut mock = MockChatModelTrait::new();
    mock.expect_invoke().returning(move |_| Ok(text.clone()));
    mock
}

/// Create a mock model that always fails with `error`.
#[must_use]
pub fn mock_model_error(error: ModelError) -> MockChatModelTrait {
    let mut mock = MockChatModelTrait::new();
    mock.expect_invoke().returning(move |_| Err(error.clone()));
    mock
}

/// Wire two mocks into a type-erased pipeline.
#[must_use]
pub fn dyn_search(
    terminology: MockTerminologyClientTrait,
    model: MockChatModelTrait,
) -> DynClinicalSearch {
    DynClinicalSearch::new(
        Arc::new(terminology) as Arc<dyn TerminologyClientTrait>,
        Arc::new(model) as Arc<dyn ChatModelTrait>,
        Arc::new(test_config()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_fixture_is_valid() {
        assert!(crate::config::validate_config(&test_config()).is_ok());
    }

    #[tokio::test]
    async fn test_mock_factories() {
        let terminology = mock_terminology_success(dialysis_result());
        assert_eq!(
            terminology.fetch_terms("dialysis").await.unwrap(),
            dialysis_result()
        );

        let terminology = mock_terminology_error(ClinicalDataError::Timeout);
        assert_eq!(
            terminology.fetch_terms("dialysis").await,
            Err(ClinicalDataError::Timeout)
        );

        let model = mock_model_success("fine");
        assert_eq!(model.invoke("p").await.unwrap(), "fine");

        let model = mock_model_error(ModelError::AuthenticationFailed);
        assert_eq!(model.invoke("p").await, Err(ModelError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_dyn_search_fixture() {
        let search = dyn_search(
            mock_terminology_success(dialysis_result()),
            mock_model_success("Dialysis filters blood."),
        );
        assert_eq!(
            search.clinical_search("dialysis").await,
            "Dialysis filters blood."
        );
    }
}
