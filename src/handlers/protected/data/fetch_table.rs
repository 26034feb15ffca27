// handlers/protected/data/fetch_table.rs - GET /api/fetch_table?tableName=...

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::{QueryId, TableName};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct FetchTableQuery {
    #[serde(rename = "tableName")]
    pub table_name: Option<String>,
}

/// Every row of an allow-listed table, ascending by its first column.
/// No pagination or projection; this endpoint exists for raw inspection.
pub async fn get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<FetchTableQuery>, QueryRejection>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let table: TableName = query
        .table_name
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("tableName is required"))?
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid table name"))?;

    tracing::debug!(user_id = %principal.user_id, table = %table, "fetch_table");

    let rows = state
        .store
        .fetch_table(table)
        .await
        .map_err(|e| ApiError::upstream(QueryId::FetchTable(table), e))?;

    Ok(Json(rows))
}
