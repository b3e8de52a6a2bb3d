use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use mandalay::application::ports::{JobProcessor, JobRepository, ProjectDirectory, UserDirectory};
use mandalay::application::services::{JobService, JobWorker, dispatch_channel};
use mandalay::infrastructure::directory::{StubProjectDirectory, StubUserDirectory};
use mandalay::infrastructure::observability::{TracingConfig, init_tracing};
use mandalay::infrastructure::persistence::{PgJobRepository, create_pool};
use mandalay::infrastructure::processor::HttpJobProcessor;
use mandalay::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(settings.environment == Environment::Prod);
    init_tracing(
        TracingConfig {
            environment: settings.environment.as_str().to_string(),
            json_format,
        },
        settings.server.port,
    );

    let pool = create_pool(&settings.database.url, settings.database.max_connections).await?;
    sqlx::migrate!().run(&pool).await?;

    let job_repository: Arc<dyn JobRepository> = Arc::new(PgJobRepository::new(pool));
    let user_directory: Arc<dyn UserDirectory> = Arc::new(StubUserDirectory::allow_all());
    let project_directory: Arc<dyn ProjectDirectory> =
        Arc::new(StubProjectDirectory::allow_all());
    let processor: Arc<dyn JobProcessor> =
        Arc::new(HttpJobProcessor::new(settings.processor.base_url.clone()));

    let (dispatch, feed) = dispatch_channel(settings.dispatch.queue_capacity);

    for _ in 0..settings.dispatch.worker_instances {
        let worker = JobWorker::new(
            feed.clone(),
            Arc::clone(&job_repository),
            Arc::clone(&processor),
        );
        tokio::spawn(worker.run());
    }
    tracing::info!(
        instances = settings.dispatch.worker_instances,
        "Job worker pool started"
    );

    let job_service = Arc::new(JobService::new(
        job_repository,
        user_directory,
        project_directory,
        dispatch,
    ));

    let router = create_router(AppState { job_service });

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
