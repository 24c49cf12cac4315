//! Failures at the messaging boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel not configured: {0}")]
    NotConfigured(String),

    #[error("messaging request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("messaging API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed messaging response: {0}")]
    Malformed(String),
}
