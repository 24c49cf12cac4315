//! Google OAuth credentials for the Gmail API.
//!
//! - Client secrets come from the installed-app `credentials.json`.
//! - The token is cached in `token.json` (compatible with the layout written
//!   by Google's auth client libraries: `token`, `refresh_token`, `expiry`).
//! - An expired token is refreshed against the token endpoint and written back.
//! - First-time consent is interactive: [`TokenManager::authorization_url`]
//!   then [`TokenManager::exchange_code`] (driven by `mailbrief auth`).
//!
//! `TokenManager` is the only writer of the token file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use mailbrief_core::config::GmailConfig;

use crate::error::AuthError;

/// Read-only Gmail scope.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Tokens this close to expiry are refreshed early.
const EXPIRY_SKEW_SECS: i64 = 60;

// ─────────────────────────────────────────────
// CredentialSource
// ─────────────────────────────────────────────

/// Something that can hand out a valid Gmail access token.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Return a currently-valid access token, refreshing if needed.
    async fn access_token(&self) -> Result<String, AuthError>;
}

// ─────────────────────────────────────────────
// On-disk formats
// ─────────────────────────────────────────────

/// `credentials.json` as downloaded from the Google Cloud console.
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

/// OAuth client registration.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// Cached token (`token.json`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredToken {
    #[serde(alias = "token")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, alias = "expiry", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl StoredToken {
    /// Usable at `now`. A token without an expiry is trusted until rejected.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(exp) => now + chrono::Duration::seconds(EXPIRY_SKEW_SECS) < exp,
            None => true,
        }
    }
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Token endpoint error body (`{"error": "invalid_grant", ...}`).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

// ─────────────────────────────────────────────
// TokenManager
// ─────────────────────────────────────────────

/// Loads, refreshes, and persists the Gmail OAuth token.
pub struct TokenManager {
    http: reqwest::Client,
    secrets_path: PathBuf,
    token_path: PathBuf,
    default_auth_uri: String,
    default_token_uri: String,
    redirect_uri: String,
    cached: Mutex<Option<StoredToken>>,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("secrets_path", &self.secrets_path)
            .field("token_path", &self.token_path)
            .finish()
    }
}

impl TokenManager {
    /// Build from the Gmail config section.
    pub fn from_config(config: &GmailConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AuthError::Refresh(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            secrets_path: mailbrief_core::utils::expand_home(&config.credentials_file),
            token_path: mailbrief_core::utils::expand_home(&config.token_file),
            default_auth_uri: config.auth_uri.clone(),
            default_token_uri: config.token_uri.clone(),
            redirect_uri: config.redirect_uri.clone(),
            cached: Mutex::new(None),
        })
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Load client secrets (`installed` or `web` section).
    pub fn load_client_secrets(&self) -> Result<ClientSecrets, AuthError> {
        if !self.secrets_path.exists() {
            return Err(AuthError::MissingClientSecrets {
                path: self.secrets_path.clone(),
            });
        }
        let file: ClientSecretsFile = read_json(&self.secrets_path)?;
        file.installed
            .or(file.web)
            .ok_or_else(|| AuthError::Consent(format!(
                "{} has neither an \"installed\" nor a \"web\" section",
                self.secrets_path.display()
            )))
    }

    /// Load the cached token from disk, if present.
    pub fn load_token(&self) -> Result<Option<StoredToken>, AuthError> {
        if !self.token_path.exists() {
            return Ok(None);
        }
        read_json(&self.token_path).map(Some)
    }

    /// Persist the token and update the in-memory cache.
    async fn store_token(&self, token: StoredToken) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(&token).map_err(|source| AuthError::Parse {
            path: self.token_path.clone(),
            source,
        })?;
        if let Some(parent) = self.token_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| AuthError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&self.token_path, json)
            .await
            .map_err(|source| AuthError::Io {
                path: self.token_path.clone(),
                source,
            })?;
        debug!(path = %self.token_path.display(), "token saved");
        *self.cached.lock().await = Some(token);
        Ok(())
    }

    /// Authorization URL the user opens to grant read-only Gmail access.
    pub fn authorization_url(&self) -> Result<String, AuthError> {
        let secrets = self.load_client_secrets()?;
        let auth_uri = secrets
            .auth_uri
            .clone()
            .unwrap_or_else(|| self.default_auth_uri.clone());
        let mut url = Url::parse(&auth_uri)
            .map_err(|e| AuthError::Consent(format!("invalid auth_uri {auth_uri}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &secrets.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", GMAIL_READONLY_SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");
        Ok(url.into())
    }

    /// Exchange an authorization code for a token and persist it.
    ///
    /// Accepts either the bare code or the full redirect URL the browser
    /// landed on.
    pub async fn exchange_code(&self, code_or_redirect: &str) -> Result<StoredToken, AuthError> {
        let code = parse_authorization_code(code_or_redirect)?;
        let secrets = self.load_client_secrets()?;
        let token_uri = secrets
            .token_uri
            .clone()
            .unwrap_or_else(|| self.default_token_uri.clone());

        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code),
            ("client_id", secrets.client_id.clone()),
            ("redirect_uri", self.redirect_uri.clone()),
        ];
        if let Some(secret) = &secrets.client_secret {
            form.push(("client_secret", secret.clone()));
        }

        let resp = self
            .post_token(&token_uri, &form)
            .await
            .map_err(AuthError::Consent)?;
        let token = StoredToken {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at: resp
                .expires_in
                .map(|s| Utc::now() + chrono::Duration::seconds(s)),
            scope: resp.scope,
        };
        self.store_token(token.clone()).await?;
        info!("Gmail authentication successful.");
        Ok(token)
    }

    /// Refresh `current` using its refresh token and persist the result.
    async fn refresh(&self, current: &StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = current
            .refresh_token
            .clone()
            .ok_or_else(|| AuthError::MissingToken {
                path: self.token_path.clone(),
            })?;
        let secrets = self.load_client_secrets()?;
        let token_uri = secrets
            .token_uri
            .clone()
            .unwrap_or_else(|| self.default_token_uri.clone());

        let mut form = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.clone()),
            ("client_id", secrets.client_id.clone()),
        ];
        if let Some(secret) = &secrets.client_secret {
            form.push(("client_secret", secret.clone()));
        }

        let resp = self
            .post_token(&token_uri, &form)
            .await
            .map_err(AuthError::Refresh)?;
        let token = StoredToken {
            access_token: resp.access_token,
            // Google omits the refresh token on refresh; keep the old one.
            refresh_token: resp.refresh_token.or(Some(refresh_token)),
            expires_at: resp
                .expires_in
                .map(|s| Utc::now() + chrono::Duration::seconds(s)),
            scope: resp.scope.or_else(|| current.scope.clone()),
        };
        self.store_token(token.clone()).await?;
        info!("Gmail token refreshed");
        Ok(token)
    }

    /// POST a form to the token endpoint; errors are flattened to a message.
    async fn post_token(
        &self,
        token_uri: &str,
        form: &[(&str, String)],
    ) -> Result<TokenResponse, String> {
        let response = self
            .http
            .post(token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| format!("token endpoint unreachable: {e}"))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read token response: {e}"))?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(desc) => format!("{} ({}): {}", status, err.error, desc),
                    None => format!("{} ({})", status, err.error),
                },
                Err(_) => format!("{status}: {body}"),
            });
        }

        serde_json::from_str(&body).map_err(|e| format!("malformed token response: {e}"))
    }
}

#[async_trait]
impl CredentialSource for TokenManager {
    async fn access_token(&self) -> Result<String, AuthError> {
        let now = Utc::now();

        let cached = self.cached.lock().await.clone();
        let current = match cached {
            Some(token) => Some(token),
            None => self.load_token()?,
        };

        let Some(current) = current else {
            return Err(AuthError::MissingToken {
                path: self.token_path.clone(),
            });
        };

        if current.is_valid_at(now) {
            *self.cached.lock().await = Some(current.clone());
            return Ok(current.access_token);
        }

        debug!("Gmail token expired, refreshing");
        Ok(self.refresh(&current).await?.access_token)
    }
}

/// Pull the `code` out of a pasted redirect URL, or take the input as the code.
fn parse_authorization_code(input: &str) -> Result<String, AuthError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthError::Consent("no authorization code given".into()));
    }

    match Url::parse(input) {
        Ok(url) => {
            let mut code = None;
            for (key, value) in url.query_pairs() {
                match key.as_ref() {
                    "code" => code = Some(value.into_owned()),
                    "error" => {
                        return Err(AuthError::Consent(format!("consent denied: {value}")))
                    }
                    _ => {}
                }
            }
            code.ok_or_else(|| AuthError::Consent("redirect URL has no `code` parameter".into()))
        }
        Err(_) => Ok(input.to_string()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AuthError> {
    let content = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| AuthError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
