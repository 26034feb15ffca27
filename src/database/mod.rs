pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod queries;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{Fixture, FixtureError, MemoryStore};
pub use postgres::{PgStore, QuerySettings};
pub use store::{AnalyticsStore, QueryId, TableName, Ticker};
