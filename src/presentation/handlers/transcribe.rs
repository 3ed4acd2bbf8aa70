use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::application::services::{validate_audio_file, TranscriptionMessage};
use crate::domain::{Job, JobId};
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct SubmitJobResponse {
    pub job_id: String,
    pub status: String,
}

/// Submission endpoint: multipart form with a `file` part plus optional
/// `provider` (default "openai"), `webhook_url` and `user_id` fields.
/// Validates synchronously, persists a queued row, then hands the job to
/// the worker queue and returns immediately.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_async_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut filename = None;
    let mut audio = None;
    let mut provider_key = "openai".to_string();
    let mut webhook_url = None;
    let mut user_id = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart body");
                return bad_request(format!("Failed to read multipart: {}", e));
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                filename = Some(field.file_name().unwrap_or("unknown").to_string());
                match field.bytes().await {
                    Ok(data) => audio = Some(data),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read file bytes");
                        return bad_request(format!("Failed to read file: {}", e));
                    }
                }
            }
            Some("provider") => {
                if let Ok(value) = field.text().await {
                    provider_key = value;
                }
            }
            Some("webhook_url") => {
                if let Ok(value) = field.text().await {
                    webhook_url = Some(value);
                }
            }
            Some("user_id") => {
                if let Ok(value) = field.text().await {
                    user_id = Some(value);
                }
            }
            _ => {}
        }
    }

    let (Some(filename), Some(audio)) = (filename, audio) else {
        tracing::warn!("Submission without a file part");
        return bad_request("No file uploaded".to_string());
    };

    let Some(provider) = state.provider_registry.resolve(&provider_key) else {
        tracing::warn!(provider = %provider_key, "Unknown provider key");
        return bad_request("Unknown provider.".to_string());
    };

    if let Err(reason) = validate_audio_file(&filename, &audio) {
        tracing::warn!(filename = %filename, reason = %reason, "Upload rejected");
        return bad_request(reason.to_string());
    }

    // Validation passed; only now does the job exist.
    let job_id = JobId::new();
    let job = Job::queued(
        job_id,
        filename.clone(),
        provider,
        webhook_url.clone(),
        user_id.clone(),
    );

    if let Err(e) = state.job_repository.upsert(&job).await {
        tracing::error!(error = %e, "Failed to persist queued job");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to create job: {}", e),
            }),
        )
            .into_response();
    }

    let msg = TranscriptionMessage {
        job_id,
        audio: audio.to_vec(),
        filename: filename.clone(),
        provider,
        webhook_url,
        user_id,
    };

    if let Err(e) = state.job_sender.send(msg).await {
        tracing::error!(error = %e, "Failed to enqueue transcription job");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Transcription queue full or workers unavailable".to_string(),
            }),
        )
            .into_response();
    }

    tracing::info!(
        job_id = %job_id,
        provider = %provider,
        filename = %filename,
        "Transcription job enqueued"
    );

    (
        StatusCode::OK,
        Json(SubmitJobResponse {
            job_id: job_id.to_string(),
            status: "queued".to_string(),
        }),
    )
        .into_response()
}

fn bad_request(error: String) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}
