use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::JobRepository;
use crate::application::services::{ProviderRegistry, TranscriptionMessage};

#[derive(Clone)]
pub struct AppState {
    pub job_repository: Arc<dyn JobRepository>,
    pub provider_registry: Arc<ProviderRegistry>,
    pub job_sender: mpsc::Sender<TranscriptionMessage>,
}
