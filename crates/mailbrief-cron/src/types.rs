//! Outcome of one job run.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a single `run_once` did. Informational only: the scheduler ignores it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    pub started_at: DateTime<Utc>,
    /// Emails returned by the fetcher.
    pub fetched: usize,
    /// Notifications the messaging provider accepted.
    pub sent: usize,
    /// Subjects whose notification failed, in processing order.
    pub failed_subjects: Vec<String>,
}

impl JobReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            fetched: 0,
            sent: 0,
            failed_subjects: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failed_subjects.len()
    }
}
