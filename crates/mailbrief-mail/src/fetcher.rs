//! Message fetcher: newest inbox messages as subject + readable body.
//!
//! `fetch` never fails: whatever was collected before an error is returned
//! and the error is logged. There is no memory of earlier runs, so the same
//! messages come back on every call until the inbox changes.

use std::sync::Arc;

use tracing::{debug, error, info};

use mailbrief_core::extract::{extract_body, NO_CONTENT};
use mailbrief_core::types::{EmailRecord, Payload};

use crate::api::GmailMessage;
use crate::auth::CredentialSource;
use crate::error::MailError;
use crate::gmail::MailProvider;

/// Subject used when a message has no `Subject` header.
pub const NO_SUBJECT: &str = "No Subject";

/// Fetches the newest messages of one label.
pub struct MessageFetcher {
    credentials: Arc<dyn CredentialSource>,
    mail: Arc<dyn MailProvider>,
    label: String,
}

impl MessageFetcher {
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        mail: Arc<dyn MailProvider>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            mail,
            label: label.into(),
        }
    }

    /// Fetch up to `max_count` of the newest messages, in provider order.
    pub async fn fetch(&self, max_count: u32) -> Vec<EmailRecord> {
        let mut emails = Vec::new();
        if let Err(e) = self.fetch_into(max_count, &mut emails).await {
            error!(error = %e, fetched = emails.len(), "Error fetching emails");
        }
        emails
    }

    async fn fetch_into(&self, max_count: u32, out: &mut Vec<EmailRecord>) -> Result<(), MailError> {
        let token = self.credentials.access_token().await?;

        let ids = self
            .mail
            .list_recent_message_ids(&token, &self.label, max_count)
            .await?;
        debug!(count = ids.len(), label = %self.label, "listed messages");

        for id in ids.iter().take(max_count as usize) {
            let message = self.mail.get_message(&token, id).await?;
            out.push(to_record(&message));
        }

        info!(count = out.len(), "fetched emails");
        Ok(())
    }
}

/// Build an `EmailRecord` from a full Gmail message.
pub fn to_record(message: &GmailMessage) -> EmailRecord {
    let subject = message.header("Subject").unwrap_or(NO_SUBJECT);
    let body = match &message.payload {
        Some(part) => extract_body(&Payload::from(part)),
        None => NO_CONTENT.to_string(),
    };
    EmailRecord::new(subject, body)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
