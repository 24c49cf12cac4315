//! Email summarizer.
//!
//! Sends the first 2000 characters of a body to the language model with a
//! fixed prompt. Every failure collapses to [`SUMMARY_FAILED`] so a bad
//! completion never stops the job.

use std::sync::Arc;

use tracing::{debug, error};

use mailbrief_core::config::LlmConfig;
use mailbrief_core::types::Message;
use mailbrief_core::utils::take_chars;

use crate::error::ProviderError;
use crate::traits::{LlmProvider, LlmRequestConfig};

/// Returned in place of a summary when the model call fails.
pub const SUMMARY_FAILED: &str = "Failed to generate summary.";

/// Characters of the body sent to the model.
pub const BODY_CHAR_LIMIT: usize = 2000;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes emails.";

fn user_prompt(body: &str) -> String {
    format!(
        "Summarize this email in 2-3 sentences: {}",
        take_chars(body, BODY_CHAR_LIMIT)
    )
}

pub struct Summarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    config: LlmRequestConfig,
}

impl Summarizer {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, config: LlmRequestConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            config,
        }
    }

    /// Build from the `llm` config section, using its model and sampling settings.
    pub fn from_config(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self::new(
            provider,
            config.model.clone(),
            LlmRequestConfig {
                max_tokens: config.max_tokens,
                temperature: config.temperature,
            },
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize `body` in a few sentences. Returns [`SUMMARY_FAILED`] on any error.
    pub async fn summarize(&self, body: &str) -> String {
        match self.try_summarize(body).await {
            Ok(summary) => summary,
            Err(e) => {
                error!(
                    error = %e,
                    provider = self.provider.display_name(),
                    "Error generating summary"
                );
                SUMMARY_FAILED.to_string()
            }
        }
    }

    async fn try_summarize(&self, body: &str) -> Result<String, ProviderError> {
        let messages = [Message::system(SYSTEM_PROMPT), Message::user(user_prompt(body))];

        let response = self.provider.chat(&messages, &self.model, &self.config).await?;

        let summary = response
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyCompletion)?;

        debug!(chars = summary.chars().count(), "summary generated");
        Ok(summary)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
