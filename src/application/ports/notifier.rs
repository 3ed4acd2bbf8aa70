use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of the outbound callback POST.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub job_id: String,
    pub status: String,
    pub text: Option<String>,
    pub summary: Option<String>,
}

/// Fire-and-forget delivery of a job outcome to a caller-supplied URL.
/// Delivery is attempted once; the worker logs and swallows errors.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifierError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("webhook delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("webhook rejected with status {0}")]
    Rejected(u16),
}
