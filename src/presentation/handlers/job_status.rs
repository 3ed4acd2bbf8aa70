use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::JobId;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    pub provider: String,
    pub text: Option<String>,
    pub summary: Option<String>,
    pub created_at: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    // A non-UUID path segment can never name a job, so it gets the same
    // not-found answer as a UUID that was never submitted.
    let Ok(uuid) = Uuid::parse_str(&job_id) else {
        return not_found();
    };

    match state.job_repository.get_by_id(JobId::from_uuid(uuid)).await {
        Ok(Some(job)) => (
            StatusCode::OK,
            Json(JobStatusResponse {
                job_id: job.id.to_string(),
                status: job.status.as_str().to_string(),
                provider: job.provider.as_str().to_string(),
                text: job.text,
                summary: job.summary,
                created_at: Some(job.created_at.to_rfc3339()),
            }),
        )
            .into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch job: {}", e),
                }),
            )
                .into_response()
        }
    }
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Job not found.".to_string(),
        }),
    )
        .into_response()
}
