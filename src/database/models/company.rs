use serde::{Deserialize, Serialize};

/// Row of the `companies` table, keyed by ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub ticker: String,
    pub companyname: String,
    pub exchange: String,
    pub currency: String,
    pub sector: String,
    pub country: String,
}
