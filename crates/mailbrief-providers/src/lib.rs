//! LLM provider layer for Mailbrief.
//!
//! # Architecture
//!
//! - [`traits::LlmProvider`]: trait every chat backend implements
//! - [`http_provider::HttpProvider`]: OpenAI-compatible HTTP client
//! - [`summarizer::Summarizer`]: email body → short summary, never fails

pub mod error;
pub mod http_provider;
pub mod summarizer;
pub mod traits;

// Re-export main types for convenience
pub use error::ProviderError;
pub use http_provider::HttpProvider;
pub use summarizer::{Summarizer, SUMMARY_FAILED};
pub use traits::{LlmProvider, LlmRequestConfig};
