//! Failures at the language-model boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("LLM request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed LLM response: {0}")]
    Malformed(String),

    #[error("LLM returned an empty completion")]
    EmptyCompletion,
}
