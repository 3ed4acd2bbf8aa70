use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;

use crate::application::ports::{TranscriptionError, TranscriptionProvider};

const DEMO_TRANSCRIPT: &str = "Google STT (demo): This is a fake transcript.";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Cloud Speech-to-Text over the REST recognize endpoint.
///
/// Without an API key this backend degrades to a clearly labeled demo
/// transcript instead of failing the job.
pub struct GoogleProvider {
    client: reqwest::Client,
    api_key: String,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    async fn request(&self, audio: &[u8]) -> Result<String, TranscriptionError> {
        let audio_b64 = base64::engine::general_purpose::STANDARD.encode(audio);
        let payload = serde_json::json!({
            "config": {"encoding": "LINEAR16", "languageCode": "en-US"},
            "audio": {"content": audio_b64},
        });

        let url = format!(
            "https://speech.googleapis.com/v1/speech:recognize?key={}",
            self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(TranscriptionError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(format!("body: {}", e)))?;

        body["results"][0]["alternatives"][0]["transcript"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TranscriptionError::RequestFailed("no transcript in response".to_string())
            })
    }
}

#[async_trait]
impl TranscriptionProvider for GoogleProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        if self.api_key.is_empty() {
            tracing::warn!("GOOGLE_API_KEY is not set, returning demo transcript");
            return Ok(Some(DEMO_TRANSCRIPT.to_string()));
        }

        match self.request(audio).await {
            Ok(transcript) => {
                tracing::info!(chars = transcript.len(), "Google transcription completed");
                Ok(Some(transcript))
            }
            Err(e) => {
                tracing::error!(error = %e, "Google transcription failed");
                Ok(None)
            }
        }
    }
}
