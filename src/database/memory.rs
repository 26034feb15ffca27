//! In-process store over seeded rows.
//!
//! Applies the same grouping, rounding and ordering rules as the SQL in
//! [`crate::database::queries`], so the HTTP layer can run without PostgreSQL
//! (tests, demos from a JSON fixture).

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Company, CurrencyCount, Customer, MonthlyJoins, PriceRange, PriceTrendPoint,
    SectorCountryCount, StockPriceRecord, TenureBySegment,
};
use crate::database::store::{AnalyticsStore, QueryId, TableName, Ticker};

/// Seed data, shaped like the three tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub stock_prices: Vec<StockPriceRecord>,
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fixture {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Fixture,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new(data: Fixture) -> Self {
        Self {
            data,
            queries: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: display.clone(),
            source,
        })?;
        let data = serde_json::from_str(&raw).map_err(|source| FixtureError::Json {
            path: display,
            source,
        })?;
        Ok(Self::new(data))
    }

    /// Number of statements issued so far, including failed ones
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Make every subsequent statement fail, as a lost connection would
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn begin(&self, query: QueryId) -> Result<(), DatabaseError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(query = %query, "memory store query");
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError(format!("{}: store unavailable", query)));
        }
        Ok(())
    }
}

/// Matches `ROUND(x::numeric, 2)`: half away from zero
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    round2(sum / Decimal::from(count as u64))
}

fn to_json_rows<T: Serialize>(rows: Vec<&T>) -> Result<Vec<Value>, DatabaseError> {
    rows.into_iter()
        .map(|row| serde_json::to_value(row).map_err(|e| DatabaseError::QueryError(e.to_string())))
        .collect()
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    async fn fetch_table(&self, table: TableName) -> Result<Vec<Value>, DatabaseError> {
        self.begin(QueryId::FetchTable(table))?;

        // sort_by is stable, ties keep insertion order
        match table {
            TableName::Customers => {
                let mut rows: Vec<&Customer> = self.data.customers.iter().collect();
                rows.sort_by(|a, b| a.customerid.cmp(&b.customerid));
                to_json_rows(rows)
            }
            TableName::Companies => {
                let mut rows: Vec<&Company> = self.data.companies.iter().collect();
                rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
                to_json_rows(rows)
            }
            TableName::StockPrices => {
                let mut rows: Vec<&StockPriceRecord> = self.data.stock_prices.iter().collect();
                rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
                to_json_rows(rows)
            }
        }
    }

    async fn avg_tenure(&self) -> Result<Vec<TenureBySegment>, DatabaseError> {
        self.begin(QueryId::AvgTenure)?;

        let mut groups: BTreeMap<&str, (Decimal, usize)> = BTreeMap::new();
        for customer in &self.data.customers {
            let entry = groups.entry(customer.segment.as_str()).or_default();
            entry.0 += customer.tenureyears;
            entry.1 += 1;
        }

        let mut rows: Vec<TenureBySegment> = groups
            .into_iter()
            .map(|(segment, (sum, count))| TenureBySegment {
                segment: Some(segment.to_string()),
                avg_tenure: Some(mean(sum, count)),
            })
            .collect();
        // groups were already ascending by segment; stable sort keeps that as tie-break
        rows.sort_by(|a, b| b.avg_tenure.cmp(&a.avg_tenure));
        Ok(rows)
    }

    async fn monthly_joins(&self) -> Result<Vec<MonthlyJoins>, DatabaseError> {
        self.begin(QueryId::MonthlyJoins)?;

        let mut months: BTreeMap<String, i64> = BTreeMap::new();
        for customer in &self.data.customers {
            *months.entry(customer.joindate.format("%Y-%m").to_string()).or_default() += 1;
        }

        Ok(months
            .into_iter()
            .map(|(month, new_customers)| MonthlyJoins {
                month: Some(month),
                new_customers,
            })
            .collect())
    }

    async fn companies_by_sector_country(&self) -> Result<Vec<SectorCountryCount>, DatabaseError> {
        self.begin(QueryId::BySectorCountry)?;

        let mut groups: BTreeMap<(&str, &str), i64> = BTreeMap::new();
        for company in &self.data.companies {
            *groups
                .entry((company.country.as_str(), company.sector.as_str()))
                .or_default() += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((country, sector), company_count)| SectorCountryCount {
                country: Some(country.to_string()),
                sector: Some(sector.to_string()),
                company_count,
            })
            .collect())
    }

    async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, DatabaseError> {
        self.begin(QueryId::CurrencyDistribution)?;

        let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
        for company in &self.data.companies {
            *groups.entry(company.currency.as_str()).or_default() += 1;
        }

        let mut rows: Vec<CurrencyCount> = groups
            .into_iter()
            .map(|(currency, company_count)| CurrencyCount {
                currency: Some(currency.to_string()),
                company_count,
            })
            .collect();
        rows.sort_by(|a, b| b.company_count.cmp(&a.company_count));
        Ok(rows)
    }

    async fn price_trend(&self, ticker: Option<&Ticker>) -> Result<Vec<PriceTrendPoint>, DatabaseError> {
        self.begin(QueryId::PriceTrend)?;

        let mut groups: BTreeMap<(chrono::NaiveDate, &str), (Decimal, usize)> = BTreeMap::new();
        for record in &self.data.stock_prices {
            if let Some(filter) = ticker {
                if record.ticker != filter.as_str() {
                    continue;
                }
            }
            let trade_date = record.trade_date().map_err(|e| {
                DatabaseError::QueryError(format!("{}: invalid trade date: {}", QueryId::PriceTrend, e))
            })?;
            let entry = groups.entry((trade_date, record.ticker.as_str())).or_default();
            entry.0 += record.close;
            entry.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|((trade_date, ticker), (sum, count))| PriceTrendPoint {
                ticker: Some(ticker.to_string()),
                trade_date: Some(trade_date),
                avg_close: Some(mean(sum, count)),
            })
            .collect())
    }

    async fn volatility(&self) -> Result<Vec<PriceRange>, DatabaseError> {
        self.begin(QueryId::Volatility)?;

        let mut ranges: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
        for record in &self.data.stock_prices {
            ranges
                .entry(record.ticker.as_str())
                .and_modify(|(min, max)| {
                    *min = (*min).min(record.close);
                    *max = (*max).max(record.close);
                })
                .or_insert((record.close, record.close));
        }

        let mut rows: Vec<PriceRange> = ranges
            .into_iter()
            .map(|(ticker, (min, max))| PriceRange {
                ticker: Some(ticker.to_string()),
                price_range: Some(round2(max - min)),
            })
            .collect();
        rows.sort_by(|a, b| b.price_range.cmp(&a.price_range));
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.begin(QueryId::HealthCheck)
    }
}
