//! Twilio channel: WhatsApp delivery through the Twilio Messages REST API.
//!
//! One form-encoded `POST /2010-04-01/Accounts/{sid}/Messages.json` per
//! message, authenticated with HTTP basic auth (`sid:auth_token`). The
//! returned `sid` is the delivery id.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use mailbrief_core::config::TwilioConfig;
use mailbrief_core::types::{DeliveryId, OutboundMessage};

use crate::base::Channel;
use crate::error::ChannelError;

/// Subset of the Twilio message resource we read back.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

pub struct TwilioChannel {
    http: reqwest::Client,
    api_base: String,
    account_sid: String,
    auth_token: String,
}

impl std::fmt::Debug for TwilioChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioChannel")
            .field("api_base", &self.api_base)
            .field("account_sid", &self.account_sid)
            .finish()
    }
}

impl TwilioChannel {
    /// Create a channel from the `twilio` config section.
    ///
    /// Fails with `NotConfigured` when the account credentials are missing.
    pub fn new(config: &TwilioConfig) -> Result<Self, ChannelError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(ChannelError::NotConfigured(
                "twilio accountSid and authToken are required".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[async_trait]
impl Channel for TwilioChannel {
    fn name(&self) -> &str {
        "twilio"
    }

    async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryId, ChannelError> {
        debug!(to = %msg.to, chars = msg.content.chars().count(), "sending Twilio message");

        let resp = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("From", msg.from.as_str()),
                ("To", msg.to.as_str()),
                ("Body", msg.content.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %body, "Twilio API error");
            return Err(ChannelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let resource: MessageResource = resp
            .json()
            .await
            .map_err(|e| ChannelError::Malformed(e.to_string()))?;

        let sid = resource
            .sid
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ChannelError::Malformed("response has no sid".into()))?;

        debug!(sid = %sid, status = resource.status.as_deref().unwrap_or("?"), "Twilio accepted message");
        Ok(DeliveryId(sid))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(api_base: &str) -> TwilioConfig {
        TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from: "whatsapp:+14155238886".into(),
            to: "whatsapp:+15551234567".into(),
            api_base: api_base.into(),
            ..TwilioConfig::default()
        }
    }

    fn message() -> OutboundMessage {
        OutboundMessage::new(
            "whatsapp:+14155238886",
            "whatsapp:+15551234567",
            "Subject: Hi\nSummary: ok",
        )
    }

    #[test]
    fn test_requires_credentials() {
        let err = TwilioChannel::new(&TwilioConfig::default()).unwrap_err();
        assert!(matches!(err, ChannelError::NotConfigured(_)));
    }

    #[test]
    fn test_messages_url() {
        let ch = TwilioChannel::new(&make_config("https://api.twilio.com/")).unwrap();
        assert_eq!(
            ch.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[tokio::test]
    async fn test_send_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/Messages.json"))
            // base64("AC123:secret")
            .and(header("Authorization", "Basic QUMxMjM6c2VjcmV0"))
            .and(body_string_contains("From=whatsapp%3A%2B14155238886"))
            .and(body_string_contains("To=whatsapp%3A%2B15551234567"))
            .and(body_string_contains("Body=Subject%3A+Hi%0ASummary%3A+ok"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": "SM0001",
                "status": "queued"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ch = TwilioChannel::new(&make_config(&server.uri())).unwrap();
        let id = ch.send(&message()).await.unwrap();
        assert_eq!(id, DeliveryId("SM0001".into()));
    }

    #[tokio::test]
    async fn test_send_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number."
            })))
            .mount(&server)
            .await;

        let ch = TwilioChannel::new(&make_config(&server.uri())).unwrap();
        match ch.send(&message()).await.unwrap_err() {
            ChannelError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("21211"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_missing_sid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "queued"})))
            .mount(&server)
            .await;

        let ch = TwilioChannel::new(&make_config(&server.uri())).unwrap();
        let err = ch.send(&message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_send_network_error() {
        let ch = TwilioChannel::new(&make_config("http://127.0.0.1:1")).unwrap();
        let err = ch.send(&message()).await.unwrap_err();
        assert!(matches!(err, ChannelError::Transport(_)));
    }
}
