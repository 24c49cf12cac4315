//! Gmail REST client.
//!
//! Two calls are needed: list the newest message ids under a label, and
//! fetch one message in `format=full`. The access token is passed per call;
//! the client itself holds no credentials.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use mailbrief_core::config::GmailConfig;

use crate::api::{GmailMessage, ListMessagesResponse};
use crate::error::MailError;

/// Mail provider operations used by the fetcher.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Ids of the newest `limit` messages carrying `label`, newest first.
    async fn list_recent_message_ids(
        &self,
        access_token: &str,
        label: &str,
        limit: u32,
    ) -> Result<Vec<String>, MailError>;

    /// Full message (headers + payload tree).
    async fn get_message(&self, access_token: &str, id: &str) -> Result<GmailMessage, MailError>;
}

/// Gmail API v1 client for the authenticated user (`users/me`).
pub struct GmailClient {
    client: reqwest::Client,
    api_base: String,
}

impl std::fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GmailClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GmailClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into(),
        })
    }

    pub fn from_config(config: &GmailConfig) -> Result<Self, MailError> {
        Self::new(
            config.api_base.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn messages_url(&self) -> String {
        format!("{}/users/me/messages", self.api_base.trim_end_matches('/'))
    }

    /// Send a GET and decode the JSON body, mapping non-2xx to `MailError::Api`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, MailError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "Gmail API error");
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MailError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_recent_message_ids(
        &self,
        access_token: &str,
        label: &str,
        limit: u32,
    ) -> Result<Vec<String>, MailError> {
        debug!(label, limit, "listing messages");
        let request = self
            .client
            .get(self.messages_url())
            .bearer_auth(access_token)
            .query(&[("labelIds", label.to_string()), ("maxResults", limit.to_string())]);

        let list: ListMessagesResponse = self.get_json(request).await?;
        Ok(list
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect())
    }

    async fn get_message(&self, access_token: &str, id: &str) -> Result<GmailMessage, MailError> {
        debug!(id, "fetching message");
        let request = self
            .client
            .get(format!("{}/{}", self.messages_url(), id))
            .bearer_auth(access_token)
            .query(&[("format", "full")]);

        self.get_json(request).await
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
