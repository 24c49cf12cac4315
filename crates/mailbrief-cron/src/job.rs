//! Job runner: one pass of fetch → summarize → notify.
//!
//! Emails are processed strictly one after another. A failed notification is
//! logged and the loop moves on to the next email; nothing here returns an
//! error to the scheduler.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use mailbrief_channels::Notifier;
use mailbrief_core::scheduler::JobFn;
use mailbrief_mail::MessageFetcher;
use mailbrief_providers::Summarizer;

use crate::types::JobReport;

/// Newest messages processed per run.
pub const DEFAULT_MAX_MESSAGES: u32 = 5;

/// Text of the WhatsApp message for one email.
pub fn format_notification(subject: &str, summary: &str) -> String {
    format!("Subject: {}\nSummary: {}", subject, summary)
}

pub struct JobRunner {
    fetcher: MessageFetcher,
    summarizer: Summarizer,
    notifier: Notifier,
    max_messages: u32,
}

impl JobRunner {
    pub fn new(fetcher: MessageFetcher, summarizer: Summarizer, notifier: Notifier) -> Self {
        Self {
            fetcher,
            summarizer,
            notifier,
            max_messages: DEFAULT_MAX_MESSAGES,
        }
    }

    pub fn with_max_messages(mut self, max_messages: u32) -> Self {
        self.max_messages = max_messages;
        self
    }

    /// Run the pipeline once over the newest messages.
    pub async fn run_once(&self) -> JobReport {
        let mut report = JobReport::new(Utc::now());

        info!("Checking for new emails...");
        let emails = self.fetcher.fetch(self.max_messages).await;
        report.fetched = emails.len();
        info!("Fetched {} emails.", emails.len());

        for email in &emails {
            let summary = self.summarizer.summarize(&email.body).await;
            let text = format_notification(&email.subject, &summary);

            match self.notifier.notify(&text).await {
                Some(_) => {
                    info!("Sent summary: {}", summary);
                    report.sent += 1;
                }
                None => {
                    error!("Failed to send summary for email: {}", email.subject);
                    report.failed_subjects.push(email.subject.clone());
                }
            }
        }

        report
    }

    /// Wrap this runner as a scheduler job.
    pub fn into_job(self: Arc<Self>) -> JobFn {
        Arc::new(move || {
            let runner = Arc::clone(&self);
            Box::pin(async move {
                runner.run_once().await;
                Ok(())
            })
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
