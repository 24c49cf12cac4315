//! Channel trait: the interface every delivery backend implements.
//!
//! A channel only sends. Mailbrief never listens for replies, so there is
//! no start/stop lifecycle.

use async_trait::async_trait;
use mailbrief_core::types::{DeliveryId, OutboundMessage};

use crate::error::ChannelError;

/// Every delivery backend implements this trait.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique channel name (e.g. "twilio").
    fn name(&self) -> &str;

    /// Deliver one outbound message, returning the provider's message id.
    async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryId, ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// A mock channel for testing.
    struct MockChannel {
        sent: Arc<tokio::sync::Mutex<Vec<OutboundMessage>>>,
    }

    #[async_trait]
    impl Channel for MockChannel {
        fn name(&self) -> &str {
            "mock"
        }

        async fn send(&self, msg: &OutboundMessage) -> Result<DeliveryId, ChannelError> {
            let mut sent = self.sent.lock().await;
            sent.push(msg.clone());
            Ok(DeliveryId(format!("SM{}", sent.len())))
        }
    }

    #[tokio::test]
    async fn test_mock_channel_send() {
        let ch = MockChannel {
            sent: Arc::new(tokio::sync::Mutex::new(Vec::new())),
        };
        assert_eq!(ch.name(), "mock");

        let msg = OutboundMessage::new("whatsapp:+1", "whatsapp:+2", "Hello!");
        let id = ch.send(&msg).await.unwrap();
        assert_eq!(id.as_str(), "SM1");

        let sent = ch.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, "Hello!");
    }

    #[test]
    fn test_channel_is_object_safe() {
        fn _takes(_: &dyn Channel) {}
    }
}
