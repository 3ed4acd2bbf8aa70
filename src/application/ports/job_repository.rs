use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::RepositoryError;

/// Durable record of jobs and their outcomes.
///
/// `upsert` is idempotent by job id: a second write for the same id
/// overwrites the mutable columns (`status`, `text`, `summary`) and keeps
/// the original `created_at`, so re-finalizing never duplicates a row.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn upsert(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    /// All jobs, newest first.
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError>;

    async fn count_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError>;

    /// Per-provider count of jobs whose status is anything but
    /// `completed`; still-queued jobs count as failures here.
    async fn count_failures_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError>;

    /// Per-user job counts; rows submitted without a user tag are skipped.
    async fn count_by_user(&self) -> Result<HashMap<String, i64>, RepositoryError>;
}
