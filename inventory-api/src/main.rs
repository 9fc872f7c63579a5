use actix_web::{web, App, HttpServer};
use anyhow::Context;
use inventory_api::{routes::configure_routes, AppState, Settings};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting inventory API");

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = (settings.server.host.clone(), settings.server.port);

    let state = AppState::initialize(settings)
        .await
        .context("Failed to initialize application state")?;

    tracing::info!(host = %bind_addr.0, port = bind_addr.1, "Starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("Inventory API shutdown complete");

    Ok(())
}
