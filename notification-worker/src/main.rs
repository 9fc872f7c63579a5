use actix_web::{web, App, HttpServer};
use anyhow::Context;
use job_queue::JobQueue;
use notification_worker::{
    config::Settings, mailer::MailClient, metrics, retry::RetryConfig, worker::Worker,
};
use tokio::signal;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting notification worker");

    let settings = Settings::load().context("Failed to load configuration")?;

    let client = redis::Client::open(settings.redis_url.as_str()).context("Invalid REDIS_URL")?;
    let redis = client
        .get_connection_manager()
        .await
        .context("Failed to connect to Redis")?;
    info!("Redis connection manager initialized");

    let queue = JobQueue::new(redis, settings.queue_key.clone());
    let mailer = MailClient::new(&settings.mail);
    let worker = Worker::new(queue, mailer, RetryConfig::from(&settings.retry));

    // Metrics exposition runs beside the consumption loop.
    let metrics_server = HttpServer::new(|| {
        App::new().route("/metrics", web::get().to(metrics::metrics_handler))
    })
    .bind(("0.0.0.0", settings.metrics_port))
    .context("Failed to bind metrics server")?
    .disable_signals()
    .run();
    let metrics_handle = metrics_server.handle();
    tokio::spawn(metrics_server);
    info!(port = settings.metrics_port, "Metrics server started");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    worker.run(shutdown_rx).await;

    metrics_handle.stop(true).await;

    info!("Notification worker shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Shutting down gracefully...");
}
