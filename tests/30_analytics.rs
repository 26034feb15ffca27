mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn get_rows(server: &common::TestServer, path: &str) -> Result<Vec<Value>> {
    let res = server.get_authed(path).await?;
    assert_eq!(res.status(), StatusCode::OK, "{path}");
    Ok(res.json().await?)
}

#[tokio::test]
async fn avg_tenure_matches_worked_example() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/customers/avg-tenure").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "segment": "Gold", "avg_tenure": 4.0 },
            { "segment": "Silver", "avg_tenure": 1.0 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn avg_tenure_segments_are_distinct_and_non_increasing() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/customers/avg-tenure").await?;
    let tenures: Vec<f64> = rows.iter().map(|r| r["avg_tenure"].as_f64().unwrap()).collect();
    assert!(tenures.windows(2).all(|w| w[0] >= w[1]));

    let mut segments: Vec<&str> = rows.iter().map(|r| r["segment"].as_str().unwrap()).collect();
    let total = segments.len();
    segments.sort();
    segments.dedup();
    assert_eq!(segments.len(), total);
    Ok(())
}

#[tokio::test]
async fn monthly_joins_cover_each_month_once_in_order() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/customers/monthly-joins").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "month": "2023-01", "new_customers": 2 },
            { "month": "2023-02", "new_customers": 1 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn companies_by_sector_country_are_ordered() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/companies/by-sector-country").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "country": "Germany", "sector": "Technology", "company_count": 1 },
            { "country": "United States", "sector": "Financials", "company_count": 1 },
            { "country": "United States", "sector": "Technology", "company_count": 2 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn currency_distribution_descends_by_count() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/companies/currency-distribution").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "currency": "USD", "company_count": 3 },
            { "currency": "EUR", "company_count": 1 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn price_trend_filters_by_ticker() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/stocks/price-trend?ticker=AAPL").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "ticker": "AAPL", "trade_date": "2024-01-02", "avg_close": 185.64 },
            { "ticker": "AAPL", "trade_date": "2024-01-03", "avg_close": 184.25 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn price_trend_without_filter_spans_all_tickers() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/stocks/price-trend").await?;
    assert_eq!(rows.len(), 6);

    let dates: Vec<&str> = rows.iter().map(|r| r["trade_date"].as_str().unwrap()).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));

    let mut tickers: Vec<&str> = rows.iter().map(|r| r["ticker"].as_str().unwrap()).collect();
    tickers.sort();
    tickers.dedup();
    assert_eq!(tickers, vec!["AAPL", "MSFT", "SAP"]);

    // blank filter behaves like no filter
    let blank = get_rows(&server, "/api/stocks/price-trend?ticker=").await?;
    assert_eq!(blank, rows);
    Ok(())
}

#[tokio::test]
async fn price_trend_rejects_malformed_ticker() -> Result<()> {
    let server = common::spawn_server().await?;

    for ticker in ["AAPL'%20OR%20'1'%3D'1", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"] {
        let res = server
            .get_authed(&format!("/api/stocks/price-trend?ticker={}", ticker))
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{ticker}");
        assert!(res.json::<Value>().await?["error"].is_string());
    }
    assert_eq!(server.store.query_count(), 0);
    Ok(())
}

#[tokio::test]
async fn volatility_is_zero_for_constant_prices() -> Result<()> {
    let server = common::spawn_server().await?;

    let rows = get_rows(&server, "/api/stocks/volatility").await?;
    assert_eq!(
        Value::Array(rows),
        json!([
            { "ticker": "AAPL", "price_range": 1.39 },
            { "ticker": "SAP", "price_range": 0.9 },
            { "ticker": "MSFT", "price_range": 0.0 }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() -> Result<()> {
    let server = common::spawn_server().await?;

    for path in common::PROTECTED_PATHS {
        let first = server.get_authed(path).await?.bytes().await?;
        let second = server.get_authed(path).await?.bytes().await?;
        assert_eq!(first, second, "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn store_failures_return_no_partial_results() -> Result<()> {
    let server = common::spawn_server().await?;
    server.store.set_unavailable(true);

    for path in &common::PROTECTED_PATHS[1..] {
        let res = server.get_authed(path).await?;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR, "{path}");
        assert_eq!(res.json::<Value>().await?, json!({ "error": "Internal server error" }));
    }
    Ok(())
}
