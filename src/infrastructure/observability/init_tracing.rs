use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::presentation::config::ObservabilitySettings;

/// Initialize the tracing subscriber with structured logging. The format
/// and environment label come from `Settings::from_env` with the rest of
/// the configuration.
pub fn init_tracing(observability: &ObservabilitySettings, port: u16) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,speech_proxy=debug,tower_http=debug"));

    if observability.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }

    tracing::info!(
        port = port,
        environment = %observability.environment,
        json_logs = observability.json_logs,
        "Server initialized"
    );
}
