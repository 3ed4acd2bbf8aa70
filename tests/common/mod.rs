#![allow(dead_code)] // each test binary uses its own subset of the helpers

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use speech_proxy::application::ports::{
    JobRepository, Notifier, NotifierError, RepositoryError, Summarizer, TranscriptionError,
    TranscriptionProvider, WebhookPayload,
};
use speech_proxy::application::services::{
    spawn_workers, ProviderRegistry, RetryPolicy, TranscriptionMessage,
};
use speech_proxy::domain::{Job, JobId, JobStatus, ProviderKind};
use speech_proxy::presentation::AppState;

// --- job repository ------------------------------------------------------

/// Mirror of the SQLite repository's semantics over a plain map: upsert
/// keeps the immutable columns from the first write and only moves
/// status/text/summary.
pub struct InMemoryJobRepository {
    rows: Mutex<HashMap<String, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn upsert(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.entry(job.id.to_string()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.status = job.status;
                existing.text = job.text.clone();
                existing.summary = job.summary.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert(job.clone());
            }
        }
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.rows.lock().unwrap().get(&id.to_string()).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Job>, RepositoryError> {
        let mut jobs: Vec<Job> = self.rows.lock().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn count_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        let mut counts = HashMap::new();
        for job in self.rows.lock().unwrap().values() {
            *counts.entry(job.provider.as_str().to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn count_failures_by_provider(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        let mut counts = HashMap::new();
        for job in self.rows.lock().unwrap().values() {
            if job.status != JobStatus::Completed {
                *counts.entry(job.provider.as_str().to_string()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn count_by_user(&self) -> Result<HashMap<String, i64>, RepositoryError> {
        let mut counts = HashMap::new();
        for job in self.rows.lock().unwrap().values() {
            if let Some(user) = &job.user_id {
                *counts.entry(user.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

// --- provider stubs ------------------------------------------------------

pub struct FixedTextProvider(pub &'static str);

#[async_trait]
impl TranscriptionProvider for FixedTextProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        Ok(Some(self.0.to_string()))
    }
}

pub struct AbsentProvider;

#[async_trait]
impl TranscriptionProvider for AbsentProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        Ok(None)
    }
}

/// Fails transiently `failures` times, then succeeds with "hello".
pub struct FlakyProvider {
    pub failures: u32,
    pub calls: Arc<AtomicU32>,
}

#[async_trait]
impl TranscriptionProvider for FlakyProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            Err(TranscriptionError::RequestFailed(format!(
                "simulated outage #{}",
                call
            )))
        } else {
            Ok(Some("hello".to_string()))
        }
    }
}

pub struct AlwaysErrProvider {
    pub calls: Arc<AtomicU32>,
}

#[async_trait]
impl TranscriptionProvider for AlwaysErrProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TranscriptionError::TimedOut("simulated timeout".to_string()))
    }
}

/// Holds a job in flight so tests can observe the queued state.
pub struct BlockingProvider(pub Duration);

#[async_trait]
impl TranscriptionProvider for BlockingProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        tokio::time::sleep(self.0).await;
        Ok(Some("late transcript".to_string()))
    }
}

// --- summarizer / notifier stubs -----------------------------------------

pub struct FixedSummarizer(pub Option<&'static str>);

#[async_trait]
impl Summarizer for FixedSummarizer {
    async fn summarize(&self, _text: &str) -> Option<String> {
        self.0.map(|s| s.to_string())
    }
}

pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, WebhookPayload)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn deliveries(&self) -> Vec<(String, WebhookPayload)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), NotifierError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}

/// Every delivery attempt fails, as if the callback endpoint is down.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _url: &str, _payload: &WebhookPayload) -> Result<(), NotifierError> {
        Err(NotifierError::DeliveryFailed(
            "connection refused".to_string(),
        ))
    }
}

// --- assembly helpers ----------------------------------------------------

pub fn registry_of(
    entries: Vec<(ProviderKind, Arc<dyn TranscriptionProvider>)>,
) -> Arc<ProviderRegistry> {
    Arc::new(ProviderRegistry::new(entries.into_iter().collect()))
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        retry_delay: Duration::from_millis(1),
    }
}

pub struct WorkerHarness {
    pub sender: mpsc::Sender<TranscriptionMessage>,
    pub repository: Arc<InMemoryJobRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn spawn_worker_harness(
    provider: Arc<dyn TranscriptionProvider>,
    summary: Option<&'static str>,
) -> WorkerHarness {
    let (sender, receiver) = mpsc::channel(16);
    let repository = Arc::new(InMemoryJobRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    spawn_workers(
        1,
        receiver,
        registry_of(vec![(ProviderKind::OpenAi, provider)]),
        Arc::new(FixedSummarizer(summary)),
        Arc::clone(&repository) as Arc<dyn JobRepository>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        fast_retry(),
    );
    WorkerHarness {
        sender,
        repository,
        notifier,
    }
}

/// Like `spawn_worker_harness` but with a caller-supplied notifier, for
/// exercising delivery failures.
pub fn spawn_worker_harness_with_notifier(
    provider: Arc<dyn TranscriptionProvider>,
    summary: Option<&'static str>,
    notifier: Arc<dyn Notifier>,
) -> (mpsc::Sender<TranscriptionMessage>, Arc<InMemoryJobRepository>) {
    let (sender, receiver) = mpsc::channel(16);
    let repository = Arc::new(InMemoryJobRepository::new());
    spawn_workers(
        1,
        receiver,
        registry_of(vec![(ProviderKind::OpenAi, provider)]),
        Arc::new(FixedSummarizer(summary)),
        Arc::clone(&repository) as Arc<dyn JobRepository>,
        notifier,
        fast_retry(),
    );
    (sender, repository)
}

pub struct TestApp {
    pub router: axum::Router,
    pub repository: Arc<InMemoryJobRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Full app over in-memory ports with one worker and a fast retry clock.
pub fn spawn_test_app(provider: Arc<dyn TranscriptionProvider>) -> TestApp {
    let (sender, receiver) = mpsc::channel(16);
    let repository = Arc::new(InMemoryJobRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let registry = registry_of(vec![
        (ProviderKind::OpenAi, provider),
        (
            ProviderKind::Aws,
            Arc::new(AbsentProvider) as Arc<dyn TranscriptionProvider>,
        ),
    ]);
    spawn_workers(
        1,
        receiver,
        Arc::clone(&registry),
        Arc::new(FixedSummarizer(Some("a short summary"))),
        Arc::clone(&repository) as Arc<dyn JobRepository>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        fast_retry(),
    );
    let state = AppState {
        job_repository: Arc::clone(&repository) as Arc<dyn JobRepository>,
        provider_registry: registry,
        job_sender: sender,
    };
    TestApp {
        router: speech_proxy::presentation::create_router(state),
        repository,
        notifier,
    }
}

pub fn message(job_id: JobId, webhook_url: Option<&str>) -> TranscriptionMessage {
    TranscriptionMessage {
        job_id,
        audio: vec![0u8; 512],
        filename: "clip.mp3".to_string(),
        provider: ProviderKind::OpenAi,
        webhook_url: webhook_url.map(String::from),
        user_id: None,
    }
}

pub fn job_with(
    status: JobStatus,
    provider: ProviderKind,
    user_id: Option<&str>,
    created_at: DateTime<Utc>,
) -> Job {
    Job {
        id: JobId::new(),
        filename: "clip.mp3".to_string(),
        provider,
        status,
        text: None,
        summary: None,
        webhook_url: None,
        user_id: user_id.map(String::from),
        created_at,
    }
}

/// Polls the repository until the job leaves `queued`, or panics after
/// five seconds.
pub async fn wait_for_terminal(repository: &dyn JobRepository, id: JobId) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(job) = repository.get_by_id(id).await.unwrap() {
            if job.status.is_terminal() {
                return job;
            }
        }
        if tokio::time::Instant::now() > deadline {
            panic!("job {} never reached a terminal state", id);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

// --- request body helpers ------------------------------------------------

pub const MULTIPART_BOUNDARY: &str = "test-boundary-4cc19e9f";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}

/// Hand-rolled multipart body: one file part plus optional plain fields.
pub fn multipart_body(filename: &str, audio: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            MULTIPART_BOUNDARY, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(b"\r\n");
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn make_wav(sample_rate: u32, seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let frames = (f64::from(sample_rate) * seconds) as u32;
        for _ in 0..frames {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
