use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, auth::require_admin};
use crate::models::Section;
use crate::services::IngestReport;

#[derive(Debug, Deserialize)]
pub struct IngestQuery {
    pub section: Section,
    #[serde(default)]
    pub dry_run: bool,
}

/// `POST /api/catalog/ingest?section=airing|finished`
///
/// Body is the raw catalog text for one section.
pub async fn ingest_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IngestQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ApiResponse<IngestReport>>, ApiError> {
    require_admin(&state, &headers)?;

    let report = state
        .ingest
        .ingest_text(&body, query.section, query.dry_run)
        .await?;

    Ok(Json(ApiResponse::success(report)))
}
