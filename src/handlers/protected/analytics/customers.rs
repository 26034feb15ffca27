// handlers/protected/analytics/customers.rs - customer analytics

use axum::{extract::State, Extension, Json};

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::{MonthlyJoins, TenureBySegment};
use crate::database::QueryId;
use crate::error::ApiError;

/// GET /api/customers/avg-tenure
///
/// Mean tenure per segment, two decimals, highest first.
pub async fn avg_tenure(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<TenureBySegment>>, ApiError> {
    tracing::debug!(user_id = %principal.user_id, "avg_tenure");

    let rows = state
        .store
        .avg_tenure()
        .await
        .map_err(|e| ApiError::upstream(QueryId::AvgTenure, e))?;

    Ok(Json(rows))
}

/// GET /api/customers/monthly-joins
///
/// Customers acquired per `YYYY-MM`, oldest month first.
pub async fn monthly_joins(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<MonthlyJoins>>, ApiError> {
    tracing::debug!(user_id = %principal.user_id, "monthly_joins");

    let rows = state
        .store
        .monthly_joins()
        .await
        .map_err(|e| ApiError::upstream(QueryId::MonthlyJoins, e))?;

    Ok(Json(rows))
}
