use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;

use crate::application::ports::TranscriptionProvider;
use crate::domain::ProviderKind;
use crate::presentation::state::AppState;

/// Bytes buffered before each partial transcription pass.
const STREAM_BUFFER_THRESHOLD: usize = 16_000;

/// What the buffering loop does with an incoming binary chunk.
#[derive(Debug, PartialEq)]
enum StreamStep {
    Buffering,
    Partial(String),
    Fail(String),
}

/// Thin buffering loop over the default provider: binary chunks
/// accumulate until the threshold, then one transcription call produces a
/// `{"partial": ...}` frame. A provider error sends one `{"error": ...}`
/// frame and ends the session. Not a streaming ASR protocol.
pub async fn transcribe_stream_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(|socket| stream_loop(socket, state))
}

async fn stream_loop(mut socket: WebSocket, state: AppState) {
    let Some(provider) = state.provider_registry.get(ProviderKind::OpenAi) else {
        let frame = serde_json::json!({"error": "no default provider registered"});
        let _ = socket.send(Message::Text(frame.to_string().into())).await;
        return;
    };

    let mut buffer: Vec<u8> = Vec::new();
    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Binary(chunk) => {
                match next_step(&mut buffer, &chunk, provider.as_ref()).await {
                    StreamStep::Buffering => {}
                    StreamStep::Partial(frame) => {
                        if socket.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    StreamStep::Fail(frame) => {
                        let _ = socket.send(Message::Text(frame.into())).await;
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

async fn next_step(
    buffer: &mut Vec<u8>,
    chunk: &[u8],
    provider: &dyn TranscriptionProvider,
) -> StreamStep {
    buffer.extend_from_slice(chunk);
    if buffer.len() <= STREAM_BUFFER_THRESHOLD {
        return StreamStep::Buffering;
    }
    let result = provider.transcribe(buffer, "stream.wav").await;
    buffer.clear();
    match result {
        Ok(text) => StreamStep::Partial(serde_json::json!({"partial": text}).to_string()),
        Err(e) => StreamStep::Fail(serde_json::json!({"error": e.to_string()}).to_string()),
    }
}
