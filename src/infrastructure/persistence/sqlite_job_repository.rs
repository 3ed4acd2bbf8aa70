use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, ProviderKind};

/// SQLite-backed job store. Every operation checks a connection out of
/// the pool for its own duration; there is no long-lived shared session.
pub struct SqliteJobRepository {
    pool: SqlitePool,
}

impl SqliteJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn count_grouped(&self, sql: &str) -> Result<HashMap<String, i64>, RepositoryError> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let mut counts = HashMap::with_capacity(rows.len());
        for row in rows {
            let key: String = row
                .try_get(0)
                .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?;
            let count: i64 = row
                .try_get(1)
                .map_err(|e| RepositoryError::CorruptRow(e.to_string()))?;
            counts.insert(key, count);
        }
        Ok(counts)
    }
}

#[async_trait]
impl JobRepository for SqliteJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id, status = %job.status))]
    async fn upsert(&self, job: &Job) -> Result<(), RepositoryError> {
        // Immutable columns (inputs and created_at) are written once on
        // insert; a conflicting write only moves the outcome columns.
        sqlx::query(
            r#"
            INSERT INTO transcription_history
                (id, filename, provider, status, text, summary, webhook_url, user_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                text = excluded.text,
                summary = excluded.summary
            "#,
        )
        .bind(job.id.to_string())
        .bind(&job.filename)
        .bind(job.provider.as_str())
        .bind(job.status.as_str())
        .bind(&job.text)
        .bind(&job.summary)
        .bind(&job.webhook_url)
        .bind(&job.user_id)
        .bind(job.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, provider, status, text, summary, webhook_url, user_id, created_at
            FROM transcription_history
            WHERE id = ?1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.map(|r| job_from_row(&r)).transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, provider, status, text, summary, webhook_url, user_id, created_at
            FROM transcription_history
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(job_from_row).collect()
    }

    async fn count_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        self.count_grouped(
            "SELECT provider, COUNT(*) FROM transcription_history GROUP BY provider",
        )
        .await
    }

    async fn count_failures_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        self.count_grouped(
            "SELECT provider, COUNT(*) FROM transcription_history \
             WHERE status != 'completed' GROUP BY provider",
        )
        .await
    }

    async fn count_by_user(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        self.count_grouped(
            "SELECT user_id, COUNT(*) FROM transcription_history \
             WHERE user_id IS NOT NULL GROUP BY user_id",
        )
        .await
    }
}

fn job_from_row(row: &SqliteRow) -> Result<Job, RepositoryError> {
    let id: String = get_column(row, "id")?;
    let uuid =
        Uuid::parse_str(&id).map_err(|e| RepositoryError::CorruptRow(format!("id: {}", e)))?;

    let provider: String = get_column(row, "provider")?;
    let provider = provider
        .parse::<ProviderKind>()
        .map_err(RepositoryError::CorruptRow)?;

    let status: String = get_column(row, "status")?;
    let status = status
        .parse::<JobStatus>()
        .map_err(RepositoryError::CorruptRow)?;

    let created_at: String = get_column(row, "created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::CorruptRow(format!("created_at: {}", e)))?;

    Ok(Job {
        id: JobId::from_uuid(uuid),
        filename: get_column(row, "filename")?,
        provider,
        status,
        text: get_column(row, "text")?,
        summary: get_column(row, "summary")?,
        webhook_url: get_column(row, "webhook_url")?,
        user_id: get_column(row, "user_id")?,
        created_at,
    })
}

fn get_column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepositoryError::CorruptRow(format!("{}: {}", name, e)))
}
