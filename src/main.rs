use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use speech_proxy::application::ports::{JobRepository, Notifier, Summarizer};
use speech_proxy::application::services::{spawn_workers, RetryPolicy};
use speech_proxy::infrastructure::llm::OpenAiSummarizer;
use speech_proxy::infrastructure::notify::HttpNotifier;
use speech_proxy::infrastructure::observability::init_tracing;
use speech_proxy::infrastructure::persistence::{create_pool, run_migrations, SqliteJobRepository};
use speech_proxy::infrastructure::providers::build_registry;
use speech_proxy::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(&settings.observability, settings.server.port);

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    run_migrations(&pool).await?;
    let job_repository: Arc<dyn JobRepository> = Arc::new(SqliteJobRepository::new(pool));

    let registry = Arc::new(build_registry(&settings.providers));
    let summarizer: Arc<dyn Summarizer> = Arc::new(OpenAiSummarizer::new(
        settings.summarizer.api_key.clone(),
        None,
        Some(settings.summarizer.model.clone()),
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new());

    let (job_sender, job_receiver) = mpsc::channel(settings.worker.queue_capacity);
    let retry_policy = RetryPolicy {
        max_retries: settings.worker.max_retries,
        retry_delay: Duration::from_secs(settings.worker.retry_delay_secs),
    };
    spawn_workers(
        settings.worker.pool_size,
        job_receiver,
        Arc::clone(&registry),
        summarizer,
        Arc::clone(&job_repository),
        notifier,
        retry_policy,
    );

    let state = AppState {
        job_repository,
        provider_registry: registry,
        job_sender,
    };
    let router = create_router(state);

    let addr: SocketAddr =
        format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
