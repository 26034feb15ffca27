// handlers/protected/analytics/companies.rs - company analytics

use axum::{extract::State, Extension, Json};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::{CurrencyCount, SectorCountryCount};
use crate::database::QueryId;
use crate::error::ApiError;

/// GET /api/companies/by-sector-country
pub async fn by_sector_country(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<SectorCountryCount>>, ApiError> {
    tracing::debug!(user_id = %principal.user_id, "by_sector_country");

    let rows = state
        .store
        .companies_by_sector_country()
        .await
        .map_err(|e| ApiError::upstream(QueryId::BySectorCountry, e))?;

    Ok(Json(rows))
}

/// GET /api/companies/currency-distribution
pub async fn currency_distribution(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<CurrencyCount>>, ApiError> {
    tracing::debug!(user_id = %principal.user_id, "currency_distribution");

    let rows = state
        .store
        .currency_distribution()
        .await
        .map_err(|e| ApiError::upstream(QueryId::CurrencyDistribution, e))?;

    Ok(Json(rows))
}
