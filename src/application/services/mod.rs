mod audio_validator;
mod provider_registry;
mod transcription_worker;

pub use audio_validator::{validate_audio_file, ValidationError, MAX_FILE_SIZE, MIN_FILE_SIZE};
pub use provider_registry::ProviderRegistry;
pub use transcription_worker::{
    spawn_workers, RetryPolicy, TranscriptionMessage, TranscriptionWorker,
};
