use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct ProviderCountsResponse {
    pub provider_counts: HashMap<String, i64>,
}

#[derive(Serialize)]
pub struct ErrorCountsResponse {
    pub error_counts: HashMap<String, i64>,
}

#[derive(Serialize)]
pub struct UserCountsResponse {
    pub user_counts: HashMap<String, i64>,
}

#[tracing::instrument(skip(state))]
pub async fn analytics_providers_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.job_repository.count_by_provider().await {
        Ok(provider_counts) => {
            (StatusCode::OK, Json(ProviderCountsResponse { provider_counts })).into_response()
        }
        Err(e) => aggregate_failed(e),
    }
}

/// Failure here means "anything but completed", still-queued jobs
/// included.
#[tracing::instrument(skip(state))]
pub async fn analytics_errors_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.job_repository.count_failures_by_provider().await {
        Ok(error_counts) => {
            (StatusCode::OK, Json(ErrorCountsResponse { error_counts })).into_response()
        }
        Err(e) => aggregate_failed(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn analytics_users_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.job_repository.count_by_user().await {
        Ok(user_counts) => {
            (StatusCode::OK, Json(UserCountsResponse { user_counts })).into_response()
        }
        Err(e) => aggregate_failed(e),
    }
}

fn aggregate_failed(e: RepositoryError) -> axum::response::Response {
    tracing::error!(error = %e, "Failed to compute analytics aggregate");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("Failed to compute aggregate: {}", e),
        }),
    )
        .into_response()
}
