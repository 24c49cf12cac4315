//! Error categories at the mail and credential boundaries.

use std::path::PathBuf;

use thiserror::Error;

/// Credential failures. Fatal for the fetch cycle they occur in.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("client secrets file {} not found (download it from the Google Cloud console)", .path.display())]
    MissingClientSecrets { path: PathBuf },

    #[error("no usable Gmail token at {} (run `mailbrief auth` first)", .path.display())]
    MissingToken { path: PathBuf },

    #[error("token refresh failed: {0}")]
    Refresh(String),

    #[error("authorization failed: {0}")]
    Consent(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures talking to the mail provider.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed mail API response: {0}")]
    Malformed(String),
}
