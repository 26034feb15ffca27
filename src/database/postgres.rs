use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::config::DatabaseConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    CurrencyCount, MonthlyJoins, PriceRange, PriceTrendPoint, SectorCountryCount, TenureBySegment,
};
use crate::database::queries;
use crate::database::store::{AnalyticsStore, QueryId, TableName, Ticker};

/// Per-statement limits and logging switches
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub timeout: Duration,
    pub log_queries: bool,
    pub slow_query_threshold: Duration,
}

impl From<&DatabaseConfig> for QuerySettings {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.query_timeout_ms),
            log_queries: config.enable_query_logging,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        }
    }
}

/// PostgreSQL-backed store over an injected pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    settings: QuerySettings,
}

impl PgStore {
    pub fn new(pool: PgPool, settings: QuerySettings) -> Self {
        Self { pool, settings }
    }

    /// Await one statement under the configured timeout.
    ///
    /// The statement future owns its pooled connection; dropping it on timeout
    /// hands the connection back to the pool.
    async fn run<T, F>(&self, query: QueryId, sql: &str, statement: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        if self.settings.log_queries {
            tracing::info!(query = %query, "{}", sql);
        }

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.settings.timeout, statement).await;
        let elapsed = started.elapsed();

        // failures are logged once, at the handler boundary
        match outcome {
            Err(_) => Err(DatabaseError::Timeout {
                query,
                after_ms: self.settings.timeout.as_millis() as u64,
            }),
            Ok(Err(e)) => Err(DatabaseError::Sqlx(e)),
            Ok(Ok(value)) => {
                if elapsed > self.settings.slow_query_threshold {
                    tracing::warn!(query = %query, elapsed_ms = elapsed.as_millis() as u64, "Slow query");
                }
                Ok(value)
            }
        }
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    async fn fetch_table(&self, table: TableName) -> Result<Vec<Value>, DatabaseError> {
        let sql = queries::fetch_table(table);
        self.run(
            QueryId::FetchTable(table),
            &queries::fetch_table_display(table),
            sqlx::query_scalar::<_, Value>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    async fn avg_tenure(&self) -> Result<Vec<TenureBySegment>, DatabaseError> {
        self.run(
            QueryId::AvgTenure,
            queries::AVG_TENURE,
            sqlx::query_as::<_, TenureBySegment>(queries::AVG_TENURE).fetch_all(&self.pool),
        )
        .await
    }

    async fn monthly_joins(&self) -> Result<Vec<MonthlyJoins>, DatabaseError> {
        self.run(
            QueryId::MonthlyJoins,
            queries::MONTHLY_JOINS,
            sqlx::query_as::<_, MonthlyJoins>(queries::MONTHLY_JOINS).fetch_all(&self.pool),
        )
        .await
    }

    async fn companies_by_sector_country(&self) -> Result<Vec<SectorCountryCount>, DatabaseError> {
        self.run(
            QueryId::BySectorCountry,
            queries::BY_SECTOR_COUNTRY,
            sqlx::query_as::<_, SectorCountryCount>(queries::BY_SECTOR_COUNTRY).fetch_all(&self.pool),
        )
        .await
    }

    async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, DatabaseError> {
        self.run(
            QueryId::CurrencyDistribution,
            queries::CURRENCY_DISTRIBUTION,
            sqlx::query_as::<_, CurrencyCount>(queries::CURRENCY_DISTRIBUTION).fetch_all(&self.pool),
        )
        .await
    }

    async fn price_trend(&self, ticker: Option<&Ticker>) -> Result<Vec<PriceTrendPoint>, DatabaseError> {
        let bound: Option<String> = ticker.map(|t| t.as_str().to_string());
        self.run(
            QueryId::PriceTrend,
            queries::PRICE_TREND,
            sqlx::query_as::<_, PriceTrendPoint>(queries::PRICE_TREND)
                .bind(bound)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn volatility(&self) -> Result<Vec<PriceRange>, DatabaseError> {
        self.run(
            QueryId::Volatility,
            queries::VOLATILITY,
            sqlx::query_as::<_, PriceRange>(queries::VOLATILITY).fetch_all(&self.pool),
        )
        .await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.run(
            QueryId::HealthCheck,
            queries::HEALTH_CHECK,
            sqlx::query(queries::HEALTH_CHECK).execute(&self.pool),
        )
        .await
        .map(|_| ())
    }
}
