use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, ProviderKind};

/// One transcription request and its lifecycle record.
///
/// `filename`, `provider`, `webhook_url` and `user_id` are fixed at
/// submission. `text` is present only on a completed job; `summary` only
/// when a summarizer also succeeded.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub filename: String,
    pub provider: ProviderKind,
    pub status: JobStatus,
    pub text: Option<String>,
    pub summary: Option<String>,
    pub webhook_url: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// A freshly submitted job, not yet picked up by a worker.
    pub fn queued(
        id: JobId,
        filename: String,
        provider: ProviderKind,
        webhook_url: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            id,
            filename,
            provider,
            status: JobStatus::Queued,
            text: None,
            summary: None,
            webhook_url,
            user_id,
            created_at: Utc::now(),
        }
    }
}
