//! Notifier: sends one text from the configured sender to the configured
//! recipient. Errors are logged and reported as `None`.

use std::sync::Arc;

use tracing::{error, info};

use mailbrief_core::config::TwilioConfig;
use mailbrief_core::types::{DeliveryId, OutboundMessage};

use crate::base::Channel;

pub struct Notifier {
    channel: Arc<dyn Channel>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(channel: Arc<dyn Channel>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            channel,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Use the sender/recipient pair from the `twilio` config section.
    pub fn from_config(channel: Arc<dyn Channel>, config: &TwilioConfig) -> Self {
        Self::new(channel, config.from.clone(), config.to.clone())
    }

    pub fn recipient(&self) -> &str {
        &self.to
    }

    /// Send `text`; `Some(id)` on success, `None` on any failure. No retry.
    pub async fn notify(&self, text: &str) -> Option<DeliveryId> {
        let msg = OutboundMessage::new(&self.from, &self.to, text);
        match self.channel.send(&msg).await {
            Ok(id) => {
                info!(channel = self.channel.name(), sid = %id, "WhatsApp message sent");
                Some(id)
            }
            Err(e) => {
                error!(channel = self.channel.name(), error = %e, "Error sending WhatsApp message");
                None
            }
        }
    }
}
