mod settings;

pub use settings::{
    DatabaseSettings, ObservabilitySettings, ProviderSettings, ServerSettings, Settings,
    SummarizerSettings, WorkerSettings,
};
