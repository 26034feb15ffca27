use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row of the `customers` table; serde names match the column names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customerid: CustomerId,
    pub customername: String,
    pub joindate: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub tenureyears: Decimal,
    pub segment: String,
}

/// Customer key as stored: an integer column sorts numerically, a text column lexically.
/// Numeric ids order before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerId::Number(n) => write!(f, "{}", n),
            CustomerId::Text(s) => write!(f, "{}", s),
        }
    }
}
