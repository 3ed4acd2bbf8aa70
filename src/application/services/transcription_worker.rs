use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tracing::Instrument;

use crate::application::ports::{
    JobRepository, Notifier, RepositoryError, Summarizer, WebhookPayload,
};
use crate::domain::{Job, JobId, JobStatus, ProviderKind};

use super::ProviderRegistry;

/// Queue payload between the submission handler and the worker pool. Must
/// round-trip through serialization without loss, audio bytes included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionMessage {
    pub job_id: JobId,
    pub audio: Vec<u8>,
    pub filename: String,
    pub provider: ProviderKind,
    pub webhook_url: Option<String>,
    pub user_id: Option<String>,
}

/// Bounded retry for transient provider failures: after the initial
/// attempt, up to `max_retries` re-attempts with a fixed delay between
/// them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(10),
        }
    }
}

/// Consumes queued transcription jobs, runs the provider (with retry),
/// derives an optional summary, writes exactly one terminal row, and
/// fires at most one webhook.
pub struct TranscriptionWorker {
    receiver: Arc<Mutex<mpsc::Receiver<TranscriptionMessage>>>,
    registry: Arc<ProviderRegistry>,
    summarizer: Arc<dyn Summarizer>,
    job_repository: Arc<dyn JobRepository>,
    notifier: Arc<dyn Notifier>,
    retry_policy: RetryPolicy,
}

impl TranscriptionWorker {
    pub fn new(
        receiver: Arc<Mutex<mpsc::Receiver<TranscriptionMessage>>>,
        registry: Arc<ProviderRegistry>,
        summarizer: Arc<dyn Summarizer>,
        job_repository: Arc<dyn JobRepository>,
        notifier: Arc<dyn Notifier>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            receiver,
            registry,
            summarizer,
            job_repository,
            notifier,
            retry_policy,
        }
    }

    pub async fn run(self) {
        tracing::info!("Transcription worker started");
        loop {
            // Lock scope keeps the receiver free while the job runs, so
            // other workers in the pool can pull the next message.
            let msg = { self.receiver.lock().await.recv().await };
            let Some(msg) = msg else { break };

            let span = tracing::info_span!(
                "transcription_job",
                job_id = %msg.job_id,
                provider = %msg.provider,
                filename = %msg.filename,
            );
            async {
                if let Err(e) = self.process_job(msg).await {
                    tracing::error!(error = %e, "Job finalization failed");
                }
            }
            .instrument(span)
            .await;
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }

    async fn process_job(&self, msg: TranscriptionMessage) -> Result<(), RepositoryError> {
        let text = self.transcribe_with_retry(&msg).await;

        let (status, summary) = match &text {
            Some(transcript) => (
                JobStatus::Completed,
                self.summarizer.summarize(transcript).await,
            ),
            None => (JobStatus::Failed, None),
        };

        let job = Job {
            id: msg.job_id,
            filename: msg.filename,
            provider: msg.provider,
            status,
            text: text.clone(),
            summary: summary.clone(),
            webhook_url: msg.webhook_url.clone(),
            user_id: msg.user_id,
            created_at: Utc::now(),
        };
        self.job_repository.upsert(&job).await?;
        tracing::info!(status = %status, "Job finalized");

        if let Some(url) = &msg.webhook_url {
            let payload = WebhookPayload {
                job_id: msg.job_id.to_string(),
                status: status.as_str().to_string(),
                text,
                summary,
            };
            if let Err(e) = self.notifier.notify(url, &payload).await {
                tracing::warn!(error = %e, url = %url, "Webhook delivery failed");
            }
        }

        Ok(())
    }

    /// One initial attempt plus up to `max_retries` sequential
    /// re-attempts. A soft failure (`Ok(None)`) is final immediately;
    /// exhausting retries finalizes the job as failed rather than letting
    /// it vanish.
    async fn transcribe_with_retry(&self, msg: &TranscriptionMessage) -> Option<String> {
        let Some(provider) = self.registry.get(msg.provider) else {
            // Submission validates the key, so this only fires if the
            // registry shrank between submission and execution.
            tracing::error!(provider = %msg.provider, "No backend registered for provider");
            return None;
        };

        let mut attempt: u32 = 0;
        loop {
            match provider.transcribe(&msg.audio, &msg.filename).await {
                Ok(Some(text)) => {
                    tracing::info!(chars = text.len(), attempt, "Transcription succeeded");
                    return Some(text);
                }
                Ok(None) => {
                    tracing::warn!(attempt, "Provider returned no transcript");
                    return None;
                }
                Err(e) if attempt < self.retry_policy.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.retry_policy.max_retries,
                        delay_ms = self.retry_policy.retry_delay.as_millis() as u64,
                        "Transient provider failure, retrying"
                    );
                    tokio::time::sleep(self.retry_policy.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempts = attempt + 1, "Provider retries exhausted");
                    return None;
                }
            }
        }
    }
}

/// Spawns a bounded pool of workers over one shared queue. Each message is
/// delivered to exactly one worker; distinct jobs run concurrently up to
/// `pool_size`.
pub fn spawn_workers(
    pool_size: usize,
    receiver: mpsc::Receiver<TranscriptionMessage>,
    registry: Arc<ProviderRegistry>,
    summarizer: Arc<dyn Summarizer>,
    job_repository: Arc<dyn JobRepository>,
    notifier: Arc<dyn Notifier>,
    retry_policy: RetryPolicy,
) -> Vec<tokio::task::JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));
    (0..pool_size)
        .map(|_| {
            let worker = TranscriptionWorker::new(
                Arc::clone(&receiver),
                Arc::clone(&registry),
                Arc::clone(&summarizer),
                Arc::clone(&job_repository),
                Arc::clone(&notifier),
                retry_policy,
            );
            tokio::spawn(worker.run())
        })
        .collect()
}
