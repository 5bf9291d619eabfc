use axum::{Extension, Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SessionUser};
use crate::db::ReportRecord;

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub total: usize,
    pub records: Vec<ReportRecord>,
}

/// GET /records
/// Raw table read for the report views, served from the TTL cache
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<RecordsResponse>>, ApiError> {
    let rows = state.records().load().await?;

    tracing::debug!(rows = rows.len(), user = %user.username, "Serving report records");

    Ok(Json(ApiResponse::success(RecordsResponse {
        total: rows.len(),
        records: rows.as_ref().clone(),
    })))
}
