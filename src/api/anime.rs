use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation::validate_anime_id};
use crate::models::PublicAnime;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub airing: Option<bool>,
}

/// `GET /api/anime`
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<PublicAnime>>>, ApiError> {
    let anime = state.catalog.list_public(query.airing).await?;
    Ok(Json(ApiResponse::success(anime)))
}

/// `GET /api/anime/{id}`
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PublicAnime>>, ApiError> {
    let id = validate_anime_id(&id)?;

    let anime = state
        .catalog
        .get_public(id)
        .await?
        .ok_or_else(|| ApiError::anime_not_found(id))?;

    Ok(Json(ApiResponse::success(anime)))
}
