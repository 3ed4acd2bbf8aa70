use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{Notifier, NotifierError, WebhookPayload};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers job outcomes to caller-supplied webhook URLs with a single
/// bounded-timeout POST. No retries; the caller of `notify` decides what
/// to do with a failure (the worker just logs it).
pub struct HttpNotifier {
    client: reqwest::Client,
}

impl HttpNotifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DELIVERY_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(url = %url, job_id = %payload.job_id, "Webhook delivered");
        Ok(())
    }
}
