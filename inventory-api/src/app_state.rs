//! Central application state.
//!
//! The single place where dependencies are wired; handlers and the auth
//! gate reach everything through `web::Data<AppState>`. The revocation
//! store is injected behind its trait so tests can swap the in-memory
//! implementation.

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;

use job_queue::JobQueue;

use crate::config::Settings;
use crate::db;
use crate::security::jwt::TokenService;
use crate::security::revocation::{RedisRevocationStore, RevocationStore};
use crate::services::breach_check::BreachCheckClient;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub redis: ConnectionManager,
    pub config: Arc<Settings>,
    pub tokens: Arc<TokenService>,
    pub revocation: Arc<dyn RevocationStore>,
    pub queue: JobQueue,
    pub breach: Arc<BreachCheckClient>,
}

impl AppState {
    pub async fn initialize(settings: Settings) -> anyhow::Result<Self> {
        use anyhow::Context;

        tracing::info!("Initializing application state");

        let db = db::create_pool(&settings.database.url, settings.database.max_connections)
            .await
            .context("Failed to connect to PostgreSQL")?;
        tracing::info!(
            max_connections = settings.database.max_connections,
            "Database pool initialized"
        );

        db::run_migrations(&db)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations completed");

        let client = redis::Client::open(settings.redis.url.as_str())
            .context("Invalid REDIS_URL")?;
        let redis = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;
        tracing::info!("Redis connection manager initialized");

        let tokens = Arc::new(TokenService::new(&settings.jwt));
        let revocation: Arc<dyn RevocationStore> =
            Arc::new(RedisRevocationStore::new(redis.clone()));
        let queue = JobQueue::new(redis.clone(), settings.queue.key.clone());
        let breach = Arc::new(BreachCheckClient::new(&settings.breach));

        Ok(Self {
            db,
            redis,
            config: Arc::new(settings),
            tokens,
            revocation,
            queue,
            breach,
        })
    }
}
