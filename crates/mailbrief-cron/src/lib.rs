//! Mailbrief Cron: the periodic fetch → summarize → notify job.
//!
//! - **types**: `JobReport`, the outcome of one run
//! - **job**: `JobRunner`, which composes the fetcher, summarizer and notifier

pub mod job;
pub mod types;

pub use job::{format_notification, JobRunner, DEFAULT_MAX_MESSAGES};
pub use types::JobReport;
