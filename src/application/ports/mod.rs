mod job_repository;
mod notifier;
mod repository_error;
mod summarizer;
mod transcription_provider;

pub use job_repository::JobRepository;
pub use notifier::{Notifier, NotifierError, WebhookPayload};
pub use repository_error::RepositoryError;
pub use summarizer::Summarizer;
pub use transcription_provider::{TranscriptionError, TranscriptionProvider};
