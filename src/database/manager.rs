use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connection pool holder for the scheduler database.
///
/// The pool is created lazily from DATABASE_URL on first use and shared
/// process-wide; `main` touches it once at startup so connection problems
/// surface before the listener binds.
pub struct Database {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl Database {
    fn instance() -> &'static Database {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<Database> = OnceLock::new();
        INSTANCE.get_or_init(|| Database { pool: Arc::new(RwLock::new(None)) })
    }

    /// Get the shared connection pool, connecting on first call
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let db = Self::instance();

        // Fast path: already connected
        {
            let pool = db.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&url)
            .await?;

        {
            let mut slot = db.pool.write().await;
            *slot = Some(pool.clone());
        }

        info!("Created database pool ({} max connections)", db_config.max_connections);
        Ok(pool)
    }

    /// Apply pending migrations from ./migrations, in version order
    pub async fn migrate() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations are up to date");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        let db = Self::instance();
        let mut slot = db.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
