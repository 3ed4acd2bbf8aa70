use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct HistoryItem {
    pub job_id: String,
    pub filename: String,
    pub provider: String,
    pub status: String,
    pub created_at: String,
}

/// All jobs, newest first.
#[tracing::instrument(skip(state))]
pub async fn history_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.job_repository.list_all().await {
        Ok(jobs) => {
            let items: Vec<HistoryItem> = jobs
                .into_iter()
                .map(|job| HistoryItem {
                    job_id: job.id.to_string(),
                    filename: job.filename,
                    provider: job.provider.as_str().to_string(),
                    status: job.status.as_str().to_string(),
                    created_at: job.created_at.to_rfc3339(),
                })
                .collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list job history");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list history: {}", e),
                }),
            )
                .into_response()
        }
    }
}
