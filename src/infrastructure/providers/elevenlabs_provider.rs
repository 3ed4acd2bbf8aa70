use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionError, TranscriptionProvider};

use super::audio_mime;

/// Hosted speech-to-text through the ElevenLabs API.
pub struct ElevenLabsProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.elevenlabs.io/v1".to_string()),
        }
    }

    async fn request(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        let url = format!("{}/speech-to-text", self.base_url);

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(audio_mime(filename))
            .map_err(|e| TranscriptionError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model_id", "scribe_v1")
            .part("file", file_part);

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("body: {}", e)))?;

        Ok(body
            .get("text")
            .and_then(|t| t.as_str())
            .map(|s| s.to_string()))
    }
}

#[async_trait]
impl TranscriptionProvider for ElevenLabsProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        if self.api_key.is_empty() {
            tracing::error!("ELEVENLABS_API_KEY is not set");
            return Ok(None);
        }

        match self.request(audio, filename).await {
            Ok(Some(transcript)) => {
                tracing::info!(chars = transcript.len(), "ElevenLabs transcription completed");
                Ok(Some(transcript))
            }
            Ok(None) => {
                tracing::error!("ElevenLabs response had no text field");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(error = %e, "ElevenLabs transcription failed");
                Ok(None)
            }
        }
    }
}
