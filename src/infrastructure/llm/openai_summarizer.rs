use async_trait::async_trait;

use crate::application::ports::Summarizer;

const SYSTEM_PROMPT: &str = "Summarize the following transcript in 1-2 sentences.";

/// Transcript summaries through the OpenAI chat completions API.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "gpt-4o".to_string()),
        }
    }

    async fn request(&self, text: &str) -> Result<String, SummaryRequestError> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": text},
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SummaryRequestError::Status(status, body));
        }

        let body: serde_json::Value = response.json().await?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or(SummaryRequestError::MalformedResponse)
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str) -> Option<String> {
        if self.api_key.is_empty() || text.is_empty() {
            return None;
        }

        match self.request(text).await {
            Ok(summary) => {
                tracing::debug!(chars = summary.len(), "Transcript summary generated");
                Some(summary)
            }
            Err(e) => {
                tracing::error!(error = %e, "Summary generation failed");
                None
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SummaryRequestError {
    #[error("request: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {0}: {1}")]
    Status(reqwest::StatusCode, String),
    #[error("malformed response")]
    MalformedResponse,
}
