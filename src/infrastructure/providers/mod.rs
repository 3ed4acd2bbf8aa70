mod aws_provider;
mod elevenlabs_provider;
mod google_provider;
mod openai_provider;

use std::collections::HashMap;
use std::sync::Arc;

pub use aws_provider::AwsProvider;
pub use elevenlabs_provider::ElevenLabsProvider;
pub use google_provider::GoogleProvider;
pub use openai_provider::OpenAiProvider;

use crate::application::ports::TranscriptionProvider;
use crate::application::services::ProviderRegistry;
use crate::domain::ProviderKind;
use crate::presentation::config::ProviderSettings;

/// All four backends, wired from configuration. Backends with missing
/// credentials stay registered: each one applies its own best-effort
/// policy at call time.
pub fn build_registry(settings: &ProviderSettings) -> ProviderRegistry {
    let mut providers: HashMap<ProviderKind, Arc<dyn TranscriptionProvider>> = HashMap::new();
    providers.insert(
        ProviderKind::OpenAi,
        Arc::new(OpenAiProvider::new(settings.openai_api_key.clone(), None, None)),
    );
    providers.insert(
        ProviderKind::ElevenLabs,
        Arc::new(ElevenLabsProvider::new(
            settings.elevenlabs_api_key.clone(),
            None,
        )),
    );
    providers.insert(
        ProviderKind::Google,
        Arc::new(GoogleProvider::new(settings.google_api_key.clone())),
    );
    providers.insert(
        ProviderKind::Aws,
        Arc::new(AwsProvider::new(
            settings.aws_access_key_id.clone(),
            settings.aws_secret_access_key.clone(),
            settings.aws_transcribe_bucket.clone(),
        )),
    );
    ProviderRegistry::new(providers)
}

/// Best-guess MIME type for the multipart uploads; backends fall back to
/// an opaque stream when the extension is unfamiliar.
pub(crate) fn audio_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_ascii_lowercase) {
        Some(ext) if ext == "wav" => "audio/wav",
        Some(ext) if ext == "mp3" => "audio/mpeg",
        Some(ext) if ext == "m4a" => "audio/mp4",
        Some(ext) if ext == "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
}
