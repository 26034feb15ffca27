// handlers/protected/analytics/stocks.rs - stock price analytics

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::{PriceRange, PriceTrendPoint};
use crate::database::store::TickerError;
use crate::database::{QueryId, Ticker};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PriceTrendQuery {
    pub ticker: Option<String>,
}

/// GET /api/stocks/price-trend[?ticker=XYZ]
///
/// Average close per ticker per trade day, oldest day first. The ticker is
/// matched by value equality and bound as a statement parameter.
pub async fn price_trend(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<PriceTrendQuery>, QueryRejection>,
) -> Result<Json<Vec<PriceTrendPoint>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let ticker = Ticker::parse_optional(query.ticker.as_deref()).map_err(|e| match e {
        TickerError::TooLong => ApiError::bad_request(format!(
            "ticker must be at most {} characters",
            Ticker::MAX_LEN
        )),
        TickerError::InvalidCharacter => ApiError::bad_request("ticker contains invalid characters"),
    })?;

    tracing::debug!(
        user_id = %principal.user_id,
        filtered = ticker.is_some(),
        "price_trend"
    );

    let rows = state
        .store
        .price_trend(ticker.as_ref())
        .await
        .map_err(|e| ApiError::upstream(QueryId::PriceTrend, e))?;

    Ok(Json(rows))
}

/// GET /api/stocks/volatility
///
/// `MAX(close) - MIN(close)` per ticker, widest range first.
pub async fn volatility(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<PriceRange>>, ApiError> {
    tracing::debug!(user_id = %principal.user_id, "volatility");

    let rows = state
        .store
        .volatility()
        .await
        .map_err(|e| ApiError::upstream(QueryId::Volatility, e))?;

    Ok(Json(rows))
}
