//! Mail side of Mailbrief.
//!
//! - [`auth`]: Google OAuth client secrets, cached token, refresh, consent
//! - [`gmail`]: Gmail REST client behind the [`MailProvider`] trait
//! - [`fetcher`]: [`MessageFetcher`], newest-N messages as `EmailRecord`s

pub mod api;
pub mod auth;
pub mod error;
pub mod fetcher;
pub mod gmail;

pub use auth::{CredentialSource, TokenManager};
pub use error::{AuthError, MailError};
pub use fetcher::MessageFetcher;
pub use gmail::{GmailClient, MailProvider};
