//! Core types for Mailbrief.
//!
//! The payload tree models a multi-part mail body as a tagged variant
//! instead of a loosely-shaped JSON object, so the extractor can match on
//! structure rather than probing for keys. The chat types model the
//! OpenAI chat completions format used by the summarizer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Message payload tree
// ─────────────────────────────────────────────

/// One node of a message's MIME structure.
///
/// A node either carries (encoded) body data directly or delegates to
/// child parts. `Container` with an empty `children` list is legal and
/// simply yields no content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// A part with no sub-parts. `data` is URL-safe base64, absent for
    /// attachments referenced by id or for empty bodies.
    Leaf {
        content_type: String,
        data: Option<String>,
    },
    /// A multipart node (`multipart/alternative`, `multipart/mixed`, …).
    Container {
        content_type: String,
        children: Vec<Payload>,
    },
}

impl Payload {
    /// Create a leaf carrying already-encoded body data.
    pub fn leaf(content_type: impl Into<String>, data: impl Into<String>) -> Self {
        Payload::Leaf {
            content_type: content_type.into(),
            data: Some(data.into()),
        }
    }

    /// Create a leaf with no body data.
    pub fn empty_leaf(content_type: impl Into<String>) -> Self {
        Payload::Leaf {
            content_type: content_type.into(),
            data: None,
        }
    }

    /// Create a container node.
    pub fn container(content_type: impl Into<String>, children: Vec<Payload>) -> Self {
        Payload::Container {
            content_type: content_type.into(),
            children,
        }
    }

    /// MIME content type of this node.
    pub fn content_type(&self) -> &str {
        match self {
            Payload::Leaf { content_type, .. } | Payload::Container { content_type, .. } => {
                content_type
            }
        }
    }

    /// Whether the content type matches `mime` (case-insensitive, parameters ignored).
    pub fn is_type(&self, mime: &str) -> bool {
        self.content_type()
            .split(';')
            .next()
            .map(|t| t.trim().eq_ignore_ascii_case(mime))
            .unwrap_or(false)
    }
}

// ─────────────────────────────────────────────
// Email record
// ─────────────────────────────────────────────

/// Subject and readable body of one fetched message.
///
/// Lives for a single job iteration; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub subject: String,
    pub body: String,
}

impl EmailRecord {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Delivery id
// ─────────────────────────────────────────────

/// Opaque identifier returned by the messaging provider (e.g. a Twilio SID).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(pub String);

impl DeliveryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────
// Outbound message
// ─────────────────────────────────────────────

/// A text message to deliver through a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Sender identity within the channel (e.g. `whatsapp:+14155238886`).
    pub from: String,
    /// Recipient identity within the channel.
    pub to: String,
    /// Text content to send.
    pub content: String,
}

impl OutboundMessage {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        OutboundMessage {
            from: from.into(),
            to: to.into(),
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Chat messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format, tagged by `role`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    /// Text content of the message.
    pub fn text(&self) -> &str {
        match self {
            Message::System { content } | Message::User { content } => content,
        }
    }
}

// ─────────────────────────────────────────────
// LLM Response
// ─────────────────────────────────────────────

/// Response from an LLM provider after a chat completion call.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Text content from the assistant.
    pub content: Option<String>,
    /// Why the model stopped generating.
    pub finish_reason: Option<String>,
    /// Token usage statistics.
    pub usage: Option<UsageInfo>,
}

/// Token usage statistics from the LLM.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Raw chat completion response from an OpenAI-compatible API.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
    pub usage: Option<UsageInfo>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Take the first choice, or `None` if the provider returned no choices.
    pub fn into_response(self) -> Option<LlmResponse> {
        let usage = self.usage;
        self.choices.into_iter().next().map(|c| LlmResponse {
            content: c.message.content,
            finish_reason: c.finish_reason,
            usage,
        })
    }
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
