use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionError, TranscriptionProvider};

use super::audio_mime;

/// Whisper transcription through the OpenAI audio API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }

    async fn request(&self, audio: &[u8], filename: &str) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(audio_mime(filename))
            .map_err(|e| TranscriptionError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, "Sending audio to OpenAI transcription API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        let transcript = response
            .text()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("body: {}", e)))?;

        Ok(transcript.trim().to_string())
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        if self.api_key.is_empty() {
            tracing::error!("OPENAI_API_KEY is not set");
            return Ok(None);
        }

        match self.request(audio, filename).await {
            Ok(transcript) => {
                tracing::info!(chars = transcript.len(), "OpenAI transcription completed");
                Ok(Some(transcript))
            }
            Err(e) => {
                tracing::error!(error = %e, "OpenAI transcription failed");
                Ok(None)
            }
        }
    }
}
