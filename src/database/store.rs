use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    CurrencyCount, MonthlyJoins, PriceRange, PriceTrendPoint, SectorCountryCount, TenureBySegment,
};

/// Read-only access to the relational store.
///
/// Each method issues exactly one statement. Implementations must release any
/// borrowed connection before returning, on success and on failure alike.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// All rows of `table`, ascending by its first column
    async fn fetch_table(&self, table: TableName) -> Result<Vec<Value>, DatabaseError>;

    async fn avg_tenure(&self) -> Result<Vec<TenureBySegment>, DatabaseError>;

    async fn monthly_joins(&self) -> Result<Vec<MonthlyJoins>, DatabaseError>;

    async fn companies_by_sector_country(&self) -> Result<Vec<SectorCountryCount>, DatabaseError>;

    async fn currency_distribution(&self) -> Result<Vec<CurrencyCount>, DatabaseError>;

    /// Daily mean close per ticker; `None` aggregates across every ticker
    async fn price_trend(&self, ticker: Option<&Ticker>) -> Result<Vec<PriceTrendPoint>, DatabaseError>;

    async fn volatility(&self) -> Result<Vec<PriceRange>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// Closed allow-list of tables the raw accessor may read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    Customers,
    Companies,
    StockPrices,
}

impl TableName {
    pub const ALL: [TableName; 3] = [TableName::Customers, TableName::Companies, TableName::StockPrices];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Customers => "customers",
            TableName::Companies => "companies",
            TableName::StockPrices => "stock_prices",
        }
    }

    /// Leading column of the table, used as its sort key
    pub fn first_column(&self) -> &'static str {
        match self {
            TableName::Customers => "customerid",
            TableName::Companies => "ticker",
            TableName::StockPrices => "ticker",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTable;

impl FromStr for TableName {
    type Err = UnknownTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only; no case folding or trimming
        TableName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(UnknownTable)
    }
}

/// Validated stock ticker used as a bound query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    TooLong,
    InvalidCharacter,
}

impl Ticker {
    pub const MAX_LEN: usize = 20;

    /// Parse an optional query value. Blank input means "no filter".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Ticker>, TickerError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > Self::MAX_LEN {
            return Err(TickerError::TooLong);
        }
        if s.is_empty()
            || !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '^'))
        {
            return Err(TickerError::InvalidCharacter);
        }
        Ok(Ticker(s.to_string()))
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identity of every statement the core issues, used in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryId {
    FetchTable(TableName),
    AvgTenure,
    MonthlyJoins,
    BySectorCountry,
    CurrencyDistribution,
    PriceTrend,
    Volatility,
    HealthCheck,
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryId::FetchTable(table) => write!(f, "fetch_table:{}", table),
            QueryId::AvgTenure => f.write_str("avg_tenure"),
            QueryId::MonthlyJoins => f.write_str("monthly_joins"),
            QueryId::BySectorCountry => f.write_str("by_sector_country"),
            QueryId::CurrencyDistribution => f.write_str("currency_distribution"),
            QueryId::PriceTrend => f.write_str("price_trend"),
            QueryId::Volatility => f.write_str("volatility"),
            QueryId::HealthCheck => f.write_str("health_check"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_accepts_known_tables_only() {
        assert_eq!("customers".parse::<TableName>(), Ok(TableName::Customers));
        assert_eq!("companies".parse::<TableName>(), Ok(TableName::Companies));
        assert_eq!("stock_prices".parse::<TableName>(), Ok(TableName::StockPrices));

        for bad in ["users", "Customers", " customers", "customers; DROP TABLE customers", ""] {
            assert_eq!(bad.parse::<TableName>(), Err(UnknownTable), "{bad:?}");
        }
    }

    #[test]
    fn first_columns_match_schema() {
        assert_eq!(TableName::Customers.first_column(), "customerid");
        assert_eq!(TableName::Companies.first_column(), "ticker");
        assert_eq!(TableName::StockPrices.first_column(), "ticker");
    }

    #[test]
    fn blank_ticker_means_no_filter() {
        assert_eq!(Ticker::parse_optional(None), Ok(None));
        assert_eq!(Ticker::parse_optional(Some("")), Ok(None));
        assert_eq!(Ticker::parse_optional(Some("  ")), Ok(None));
    }

    #[test]
    fn ticker_validation() {
        assert_eq!(Ticker::parse_optional(Some("AAPL")).unwrap().unwrap().as_str(), "AAPL");
        assert!("BRK.B".parse::<Ticker>().is_ok());
        assert!("^GSPC".parse::<Ticker>().is_ok());
        assert_eq!("AAPL' OR '1'='1".parse::<Ticker>(), Err(TickerError::InvalidCharacter));
        assert_eq!("A".repeat(21).parse::<Ticker>(), Err(TickerError::TooLong));
    }

    #[test]
    fn query_ids_render_without_caller_text() {
        assert_eq!(QueryId::FetchTable(TableName::StockPrices).to_string(), "fetch_table:stock_prices");
        assert_eq!(QueryId::PriceTrend.to_string(), "price_trend");
    }
}
