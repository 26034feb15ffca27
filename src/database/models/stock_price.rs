use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Textual layout of `stock_prices.date`
pub const TRADE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Row of the `stock_prices` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPriceRecord {
    pub ticker: String,
    /// Stored as `DD/MM/YYYY` text, see [`StockPriceRecord::trade_date`]
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    pub currency: String,
}

impl StockPriceRecord {
    pub fn trade_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(self.date.trim(), TRADE_DATE_FORMAT)
    }
}
