//! Result shapes of the aggregation queries.
//!
//! Field names are the JSON keys clients read. Averages and ranges are rounded
//! to two decimals by the store and serialized as JSON numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TenureBySegment {
    pub segment: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_tenure: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MonthlyJoins {
    /// `YYYY-MM`
    pub month: Option<String>,
    pub new_customers: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SectorCountryCount {
    pub country: Option<String>,
    pub sector: Option<String>,
    pub company_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CurrencyCount {
    pub currency: Option<String>,
    pub company_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PriceTrendPoint {
    pub ticker: Option<String>,
    pub trade_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub avg_close: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PriceRange {
    pub ticker: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_range: Option<Decimal>,
}
