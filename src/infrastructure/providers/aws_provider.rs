use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::{TranscriptionError, TranscriptionProvider};

const DEMO_TRANSCRIPT: &str = "AWS Transcribe (demo): This is a fake transcript.";

/// AWS Transcribe backend, stubbed at the job-submission boundary.
///
/// Transcribe works asynchronously: the audio is uploaded to a bucket, a
/// transcription job is started against it, and the result is fetched
/// later. Result polling is out of scope here, so with credentials
/// configured this backend returns the job reference as its transcript;
/// without credentials it returns a labeled demo transcript. Both count
/// as successful text.
pub struct AwsProvider {
    access_key_id: String,
    secret_access_key: String,
    bucket: String,
}

impl AwsProvider {
    pub fn new(access_key_id: String, secret_access_key: String, bucket: String) -> Self {
        Self {
            access_key_id,
            secret_access_key,
            bucket,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for AwsProvider {
    async fn transcribe(
        &self,
        _audio: &[u8],
        filename: &str,
    ) -> Result<Option<String>, TranscriptionError> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            tracing::warn!("AWS credentials not set, returning demo transcript");
            return Ok(Some(DEMO_TRANSCRIPT.to_string()));
        }

        let s3_key = format!("uploads/{}_{}", Uuid::new_v4(), filename);
        let job_name = format!("job-{}", Uuid::new_v4());
        tracing::info!(
            bucket = %self.bucket,
            key = %s3_key,
            job = %job_name,
            "AWS Transcribe job reference issued (submission stubbed)"
        );

        Ok(Some(format!(
            "AWS Transcribe job started: {} (polling not implemented)",
            job_name
        )))
    }
}
