//! Config loader: reads `~/.mailbrief/config.json`, then layers `.env` and
//! environment variables on top.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.mailbrief/config.json`
//! 3. Plain deployment variables (`OPENAI_API_KEY`, `TWILIO_ACCOUNT_SID`, …),
//!    which may come from a `.env` file in the working directory
//! 4. `MAILBRIEF_<SECTION>__<FIELD>` variables (highest)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given (or default) path, `.env`, and env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
/// Call once at process start.
pub fn load_config(path: Option<&Path>) -> Config {
    match dotenvy::dotenv() {
        Ok(env_path) => debug!("Loaded environment from {}", env_path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to read .env file: {}", e),
    }

    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Plain deployment variables:
/// - `OPENAI_API_KEY` → `llm.api_key`
/// - `TWILIO_ACCOUNT_SID` → `twilio.account_sid`
/// - `TWILIO_AUTH_TOKEN` → `twilio.auth_token`
/// - `TWILIO_WHATSAPP_NUMBER` → `twilio.from`
/// - `YOUR_WHATSAPP_NUMBER` → `twilio.to`
///
/// Namespaced (`MAILBRIEF_<SECTION>__<FIELD>`, double underscore as delimiter)
/// override everything else, e.g. `MAILBRIEF_LLM__MODEL`,
/// `MAILBRIEF_SCHEDULE__INTERVAL_SECS`, `MAILBRIEF_GMAIL__TOKEN_FILE`.
fn apply_env_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    // Plain deployment variables
    set_string(&mut config.llm.api_key, var("OPENAI_API_KEY"));
    set_string(&mut config.twilio.account_sid, var("TWILIO_ACCOUNT_SID"));
    set_string(&mut config.twilio.auth_token, var("TWILIO_AUTH_TOKEN"));
    set_string(&mut config.twilio.from, var("TWILIO_WHATSAPP_NUMBER"));
    set_string(&mut config.twilio.to, var("YOUR_WHATSAPP_NUMBER"));

    // Gmail
    set_string(&mut config.gmail.credentials_file, var("MAILBRIEF_GMAIL__CREDENTIALS_FILE"));
    set_string(&mut config.gmail.token_file, var("MAILBRIEF_GMAIL__TOKEN_FILE"));
    set_string(&mut config.gmail.api_base, var("MAILBRIEF_GMAIL__API_BASE"));
    set_string(&mut config.gmail.redirect_uri, var("MAILBRIEF_GMAIL__REDIRECT_URI"));
    set_string(&mut config.gmail.auth_uri, var("MAILBRIEF_GMAIL__AUTH_URI"));
    set_string(&mut config.gmail.token_uri, var("MAILBRIEF_GMAIL__TOKEN_URI"));
    set_string(&mut config.gmail.label, var("MAILBRIEF_GMAIL__LABEL"));
    set_parsed(&mut config.gmail.timeout_secs, var("MAILBRIEF_GMAIL__TIMEOUT_SECS"));

    // LLM
    set_string(&mut config.llm.api_key, var("MAILBRIEF_LLM__API_KEY"));
    set_string(&mut config.llm.api_base, var("MAILBRIEF_LLM__API_BASE"));
    set_string(&mut config.llm.model, var("MAILBRIEF_LLM__MODEL"));
    set_parsed(&mut config.llm.max_tokens, var("MAILBRIEF_LLM__MAX_TOKENS"));
    set_parsed(&mut config.llm.temperature, var("MAILBRIEF_LLM__TEMPERATURE"));
    set_parsed(&mut config.llm.timeout_secs, var("MAILBRIEF_LLM__TIMEOUT_SECS"));

    // Twilio
    set_string(&mut config.twilio.account_sid, var("MAILBRIEF_TWILIO__ACCOUNT_SID"));
    set_string(&mut config.twilio.auth_token, var("MAILBRIEF_TWILIO__AUTH_TOKEN"));
    set_string(&mut config.twilio.from, var("MAILBRIEF_TWILIO__FROM"));
    set_string(&mut config.twilio.to, var("MAILBRIEF_TWILIO__TO"));
    set_string(&mut config.twilio.api_base, var("MAILBRIEF_TWILIO__API_BASE"));
    set_parsed(&mut config.twilio.timeout_secs, var("MAILBRIEF_TWILIO__TIMEOUT_SECS"));

    // Schedule
    set_parsed(&mut config.schedule.interval_secs, var("MAILBRIEF_SCHEDULE__INTERVAL_SECS"));
    set_parsed(&mut config.schedule.tick_millis, var("MAILBRIEF_SCHEDULE__TICK_MILLIS"));
    set_parsed(&mut config.schedule.max_messages, var("MAILBRIEF_SCHEDULE__MAX_MESSAGES"));

    config
}

fn set_string(field: &mut String, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        *field = v;
    }
}

fn set_parsed<T: std::str::FromStr>(field: &mut T, value: Option<String>) {
    if let Some(v) = value {
        match v.trim().parse::<T>() {
            Ok(parsed) => *field = parsed,
            Err(_) => warn!("Ignoring unparseable env override value: {}", v),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
