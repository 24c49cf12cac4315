//! Configuration schema.
//!
//! Hierarchy: `Config` → `GmailConfig`, `LlmConfig`, `TwilioConfig`,
//! `ScheduleConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.mailbrief/config.json`, `.env`, and env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub gmail: GmailConfig,
    pub llm: LlmConfig,
    pub twilio: TwilioConfig,
    pub schedule: ScheduleConfig,
}

// ─────────────────────────────────────────────
// Gmail
// ─────────────────────────────────────────────

/// Gmail API and OAuth settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GmailConfig {
    /// Google client secrets file (`credentials.json` from the Cloud console).
    pub credentials_file: String,
    /// Where the access/refresh token is cached.
    pub token_file: String,
    /// Gmail REST API base URL.
    pub api_base: String,
    /// OAuth authorization endpoint (used when the secrets file omits it).
    pub auth_uri: String,
    /// OAuth token endpoint (used when the secrets file omits it).
    pub token_uri: String,
    /// Redirect URI registered for the installed app.
    pub redirect_uri: String,
    /// Label to poll.
    pub label: String,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            credentials_file: "credentials.json".to_string(),
            token_file: "token.json".to_string(),
            api_base: "https://gmail.googleapis.com/gmail/v1".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            redirect_uri: "http://localhost:8080/".to_string(),
            label: "INBOX".to_string(),
            timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────
// LLM
// ─────────────────────────────────────────────

/// Language-model settings for the summarizer (OpenAI-compatible API).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LlmConfig {
    /// API key for Bearer authentication.
    pub api_key: String,
    /// API base URL.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate per summary.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            max_tokens: 256,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Whether an API key is set.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Twilio
// ─────────────────────────────────────────────

/// Twilio messaging settings (WhatsApp sender/recipient).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender identity, e.g. `whatsapp:+14155238886`.
    pub from: String,
    /// Recipient identity, e.g. `whatsapp:+15551234567`.
    pub to: String,
    /// Twilio REST API base URL.
    pub api_base: String,
    /// HTTP timeout per request, in seconds.
    pub timeout_secs: u64,
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from: String::new(),
            to: String::new(),
            api_base: "https://api.twilio.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl TwilioConfig {
    /// Whether credentials and both identities are set.
    pub fn is_configured(&self) -> bool {
        !self.account_sid.is_empty()
            && !self.auth_token.is_empty()
            && !self.from.is_empty()
            && !self.to.is_empty()
    }
}

// ─────────────────────────────────────────────
// Schedule
// ─────────────────────────────────────────────

/// Polling schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleConfig {
    /// Seconds between job runs.
    pub interval_secs: u64,
    /// Idle check granularity, in milliseconds.
    pub tick_millis: u64,
    /// How many of the newest messages each run processes.
    pub max_messages: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10 * 60,
            tick_millis: 1000,
            max_messages: 5,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
