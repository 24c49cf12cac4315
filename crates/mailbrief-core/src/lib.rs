//! Mailbrief core: shared types, body extraction, configuration, scheduling.
//!
//! - [`types`]: payload tree, email records, delivery ids
//! - [`extract`]: readable-text extraction from a payload tree
//! - [`config`]: JSON + `.env` + env var configuration
//! - [`scheduler`]: fixed-interval job loop

pub mod config;
pub mod extract;
pub mod scheduler;
pub mod types;
pub mod utils;

pub use extract::{extract_body, NO_CONTENT};
pub use types::{DeliveryId, EmailRecord, Payload};
