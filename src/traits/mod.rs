//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`TerminologyClientTrait`]: clinical terminology lookup
//! - [`ChatModelTrait`]: language-model invocation
//!
//! The search orchestrator is generic over both, so tests and alternative
//! backends plug in without touching the pipeline.
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::clinical::ClinicalSearchResult;
use crate::error::{ClinicalDataError, ModelError};

/// Terminology lookup client trait for mocking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerminologyClientTrait: Send + Sync {
    /// Look up conditions matching a non-empty query.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicalDataError`] on timeout, transport failure, zero
    /// matches, or an unreadable response layout.
    async fn fetch_terms(&self, query: &str) -> Result<ClinicalSearchResult, ClinicalDataError>;
}

/// Language-model client trait for mocking.
///
/// One rendered prompt in, the model's reply text out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModelTrait: Send + Sync {
    /// Send a prompt and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the backend call fails or the reply is
    /// unusable.
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl<T: TerminologyClientTrait + ?Sized> TerminologyClientTrait for Arc<T> {
    async fn fetch_terms(&self, query: &str) -> Result<ClinicalSearchResult, ClinicalDataError> {
        (**self).fetch_terms(query).await
    }
}

#[async_trait]
impl<M: ChatModelTrait + ?Sized> ChatModelTrait for Arc<M> {
    async fn invoke(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).invoke(prompt).await
    }
}
