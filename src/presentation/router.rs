use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analytics_errors_handler, analytics_providers_handler, analytics_users_handler,
    health_handler, history_handler, job_status_handler, list_providers_handler,
    transcribe_async_handler, transcribe_stream_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/transcribe_async", post(transcribe_async_handler))
        .route("/job_status/{job_id}", get(job_status_handler))
        .route("/history", get(history_handler))
        .route("/providers", get(list_providers_handler))
        .route("/analytics/providers", get(analytics_providers_handler))
        .route("/analytics/errors", get(analytics_errors_handler))
        .route("/analytics/users", get(analytics_users_handler))
        .route("/ws/transcribe_stream", get(transcribe_stream_handler))
        // Uploads above the validator's 10 MiB cap must reach the
        // validator so the client sees the documented rejection, not a
        // transport-level 413.
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
