use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<crate::filter::error::FilterError> for DatabaseError {
    fn from(err: crate::filter::error::FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

impl DatabaseError {
    /// True when the pool could not hand out a connection at all
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
                | DatabaseError::Sqlx(sqlx::Error::PoolClosed)
                | DatabaseError::Sqlx(sqlx::Error::Io(_))
                | DatabaseError::Sqlx(sqlx::Error::Tls(_))
        )
    }
}

/// Owns the catalog connection pool and the query logging settings
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
    settings: Arc<DatabaseConfig>,
}

impl DatabaseManager {
    /// Build a lazily-connecting pool; no connection is attempted until first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connection_string = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let url = url::Url::parse(connection_string).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(connection_string)?;

        info!(
            "Created database pool for: {}{}",
            url.host_str().unwrap_or("localhost"),
            url.path()
        );

        Ok(Self {
            pool,
            settings: Arc::new(config.clone()),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    /// Log a statement before it runs, if query logging is enabled
    pub fn log_query(&self, sql: &str) {
        if self.settings.enable_query_logging {
            debug!(target: "catalog_api_rust::sql", "{}", sql);
        }
    }

    /// Warn when a statement exceeded the slow query threshold
    pub fn observe_duration(&self, label: &str, started: Instant) {
        if !self.settings.enable_slow_query_warning {
            return;
        }
        let elapsed = started.elapsed();
        if elapsed > Duration::from_millis(self.settings.slow_query_threshold_ms) {
            warn!("Slow query ({}): {} ms", label, elapsed.as_millis());
        }
    }
}
