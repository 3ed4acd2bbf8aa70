use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::application::ports::RepositoryError;

const CREATE_HISTORY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transcription_history (
    id          TEXT PRIMARY KEY,
    filename    TEXT NOT NULL,
    provider    TEXT NOT NULL,
    status      TEXT NOT NULL,
    text        TEXT,
    summary     TEXT,
    webhook_url TEXT,
    user_id     TEXT,
    created_at  TEXT NOT NULL
)
"#;

/// Connection pool over a SQLite database URL such as
/// `sqlite://history.db` or `sqlite::memory:`.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<SqlitePool, RepositoryError> {
    let options: SqliteConnectOptions = url
        .parse()
        .map_err(|e: sqlx::Error| RepositoryError::ConnectionFailed(e.to_string()))?;

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .connect_with(options.create_if_missing(true))
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

    tracing::info!("SQLite connection pool established");
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(CREATE_HISTORY_TABLE)
        .execute(pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    Ok(())
}
