use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<&'static str>,
}

pub async fn list_providers_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ProvidersResponse {
            providers: state.provider_registry.names(),
        }),
    )
}
