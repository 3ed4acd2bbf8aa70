use async_trait::async_trait;

/// Pluggable transcription backend.
///
/// `Ok(Some(text))` is a successful transcript (placeholder text from a
/// credential-less demo backend counts as success). `Ok(None)` is a
/// permanent soft failure: the backend gave up and the job fails without
/// retry. `Err` signals a transient fault and drives the worker's bounded
/// retry loop.
///
/// The bundled HTTP backends absorb all of their internal failures
/// (missing credentials, network errors, malformed responses) into
/// `Ok(None)` with a logged diagnostic.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> Result<Option<String>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("provider request failed: {0}")]
    RequestFailed(String),
    #[error("provider timed out: {0}")]
    TimedOut(String),
}
