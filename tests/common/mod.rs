#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use market_analytics_api::app::{app, AppState};
use market_analytics_api::auth::{issue_token, TokenIssue, TokenVerifier, UserId};
use market_analytics_api::config::AppConfig;
use market_analytics_api::database::{Fixture, MemoryStore};
use serde_json::json;

pub const SECRET: &str = "integration-test-secret";

/// Every token-gated route, with a query string that would otherwise succeed
pub const PROTECTED_PATHS: &[&str] = &[
    "/api/fetch_table?tableName=customers",
    "/api/customers/avg-tenure",
    "/api/customers/monthly-joins",
    "/api/companies/by-sector-country",
    "/api/companies/currency-distribution",
    "/api/stocks/price-trend",
    "/api/stocks/price-trend?ticker=AAPL",
    "/api/stocks/volatility",
];

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with a freshly minted, valid token
    pub async fn get_authed(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(valid_token()?)
            .send()
            .await?)
    }
}

/// Start the real router on an unused port, backed by the seeded in-memory store
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(seed()).await
}

pub async fn spawn_server_with(fixture: Fixture) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    });

    let store = Arc::new(MemoryStore::new(fixture));
    let verifier = TokenVerifier::new(SECRET)?;
    let router = app(AppState::new(store.clone(), verifier), &config);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(TestServer {
        base_url,
        store,
        client: reqwest::Client::new(),
    })
}

pub fn valid_token() -> Result<String> {
    mint(SECRET, chrono::Duration::hours(1))
}

pub fn mint(secret: &str, ttl: chrono::Duration) -> Result<String> {
    let issue = TokenIssue {
        user_id: UserId::Number(1),
        username: Some("analyst".to_string()),
        role: Some("viewer".to_string()),
    };
    Ok(issue_token(&issue, secret, ttl)?)
}

/// Small but representative data set
pub fn seed() -> Fixture {
    serde_json::from_value(json!({
        "customers": [
            { "customerid": "C3", "customername": "Carol", "joindate": "2023-02-11", "tenureyears": 1, "segment": "Silver" },
            { "customerid": "C1", "customername": "Alice", "joindate": "2023-01-05", "tenureyears": 3, "segment": "Gold" },
            { "customerid": "C2", "customername": "Bob",   "joindate": "2023-01-28", "tenureyears": 5, "segment": "Gold" }
        ],
        "companies": [
            { "ticker": "SAP",  "companyname": "SAP SE",          "exchange": "XETRA",  "currency": "EUR", "sector": "Technology", "country": "Germany" },
            { "ticker": "AAPL", "companyname": "Apple Inc",       "exchange": "NASDAQ", "currency": "USD", "sector": "Technology", "country": "United States" },
            { "ticker": "JPM",  "companyname": "JPMorgan Chase",  "exchange": "NYSE",   "currency": "USD", "sector": "Financials", "country": "United States" },
            { "ticker": "MSFT", "companyname": "Microsoft Corp",  "exchange": "NASDAQ", "currency": "USD", "sector": "Technology", "country": "United States" }
        ],
        "stock_prices": [
            { "ticker": "AAPL", "date": "03/01/2024", "close": 184.25, "currency": "USD" },
            { "ticker": "AAPL", "date": "02/01/2024", "close": 185.64, "currency": "USD" },
            { "ticker": "MSFT", "date": "02/01/2024", "close": 370.87, "currency": "USD" },
            { "ticker": "MSFT", "date": "03/01/2024", "close": 370.87, "currency": "USD" },
            { "ticker": "SAP",  "date": "02/01/2024", "close": 140.10, "currency": "EUR" },
            { "ticker": "SAP",  "date": "03/01/2024", "close": 141.00, "currency": "EUR" }
        ]
    }))
    .expect("seed fixture is valid")
}
