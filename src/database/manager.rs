use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::database::store::QueryId;

/// Errors raised by the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Query {query} timed out after {after_ms}ms")]
    Timeout { query: QueryId, after_ms: u64 },

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl From<ConfigError> for DatabaseError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing(key) => DatabaseError::ConfigMissing(key),
            ConfigError::InvalidDatabaseUrl(msg) => DatabaseError::InvalidDatabaseUrl(msg),
        }
    }
}

/// Builds the bounded connection pool handed to the store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Create the pool without opening a connection yet; the first query (or
    /// `/health`) surfaces connectivity problems.
    pub fn connect(config: &AppConfig) -> Result<PgPool, DatabaseError> {
        let url = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
            .connect_lazy(url)?;

        info!(
            "Created database pool (max_connections = {})",
            config.database.max_connections
        );
        Ok(pool)
    }

    /// Close the pool on shutdown, waiting for checked-out connections
    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
