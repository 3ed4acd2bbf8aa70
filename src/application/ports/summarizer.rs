use async_trait::async_trait;

/// Derives a short summary from a transcript.
///
/// Summarization is strictly best-effort: `None` covers both "no summary
/// available" and any internal failure, and never affects job status.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Option<String>;
}
