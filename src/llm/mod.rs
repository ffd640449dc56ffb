//! Language-model client.
//!
//! This module provides:
//! - [`ChatClient`]: OpenAI-compatible chat-completions client (Hugging Face
//!   inference by default)
//! - [`ClientConfig`]: endpoint, model and sampling settings
//! - Wire types for requests and responses
//!
//! # Example
//!
//! ```
//! use clinical_search::llm::{ChatClient, ClientConfig};
//!
//! let config = ClientConfig::default()
//!     .with_base_url("http://localhost:8080/v1")
//!     .with_temperature(0.2);
//! let client = ChatClient::new("hf_xxx", config).unwrap();
//! assert_eq!(client.config().temperature, 0.2);
//! ```

mod client;
mod config;
mod types;

pub use client::{ChatClient, MAX_PROMPT_LENGTH};
pub use config::{ClientConfig, DEFAULT_TIMEOUT_MS};
pub use types::{ChatChoice, ChatChoiceMessage, ChatMessage, ChatRequest, ChatResponse};
