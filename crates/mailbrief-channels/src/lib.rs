//! Mailbrief Channels: outbound message delivery.
//!
//! This crate provides:
//! - **base**: The `Channel` trait every delivery backend satisfies
//! - **twilio**: WhatsApp delivery through the Twilio Messages API
//! - **notifier**: `Notifier`: sends one text to the configured recipient, never fails

pub mod base;
pub mod error;
pub mod notifier;
pub mod twilio;

pub use base::Channel;
pub use error::ChannelError;
pub use notifier::Notifier;
pub use twilio::TwilioChannel;
