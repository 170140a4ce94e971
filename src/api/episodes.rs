use axum::{Json, extract::State, http::HeaderMap};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, TokenRequest, TokenResponse, auth::bearer_token,
    validation::validate_reference,
};
use crate::domain::EpisodeReference;
use crate::services::ResolvedEpisode;

/// `POST /api/episodes/token`
///
/// Exchanges a public episode reference for a short-lived playback token.
/// Only the reference shape is checked here; whether the episode exists is
/// decided at resolve time.
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    state.tokens.ensure_configured()?;
    let reference = validate_reference(&payload.reference)?;
    EpisodeReference::decode(reference)?;

    let issued = state.tokens.issue(reference)?;
    tracing::debug!(reference = %reference, "Issued playback token");

    Ok(Json(ApiResponse::success(TokenResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl().num_seconds(),
        expires_at: issued.expires_at.to_rfc3339(),
    })))
}

/// `GET /api/episodes/resolve`
///
/// Redeems a bearer token for the episode's video URL. Tokens are not
/// consumed and may be redeemed until they expire.
pub async fn resolve_episode(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<ResolvedEpisode>>, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let reference = state.tokens.verify(&token)?;
    let resolved = state.resolver.resolve(&reference).await?;

    Ok(Json(ApiResponse::success(resolved)))
}
