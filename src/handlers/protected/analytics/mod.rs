// handlers/protected/analytics/mod.rs - aggregation endpoints
//
// Each handler issues exactly one aggregation statement and returns its rows
// as a JSON array. No partial results are ever returned on failure.

pub mod companies;
pub mod customers;
pub mod stocks;

pub use companies::{by_sector_country, currency_distribution};
pub use customers::{avg_tenure, monthly_joins};
pub use stocks::{price_trend, volatility};
