use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::limits::MAX_INGEST_BODY_BYTES;
use crate::db::{CatalogStore, Store};
use crate::services::{
    CatalogService, EpisodeResolver, FixedIntervalThrottle, IngestService, TokenService,
};

mod anime;
pub mod auth;
mod catalog;
mod episodes;
mod error;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub catalog: Arc<CatalogService>,

    pub tokens: Arc<TokenService>,

    pub resolver: Arc<EpisodeResolver>,

    pub ingest: Arc<IngestService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::from_config(&config.general).await?;

    Ok(Arc::new(build_state(config, store, prometheus_handle)))
}

/// Wires the services around an already connected store.
#[must_use]
pub fn build_state(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> AppState {
    let shared: Arc<dyn CatalogStore> = Arc::new(store.clone());

    let throttle = Arc::new(FixedIntervalThrottle::new(Duration::from_millis(
        config.ingest.upsert_interval_ms,
    )));

    AppState {
        catalog: Arc::new(CatalogService::new(shared.clone())),
        tokens: Arc::new(TokenService::new(&config.tokens)),
        resolver: Arc::new(EpisodeResolver::new(shared.clone())),
        ingest: Arc::new(IngestService::new(shared, throttle)),
        config: Arc::new(config),
        store,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/anime", get(anime::list_anime))
        .route("/anime/{id}", get(anime::get_anime))
        .route("/episodes/token", post(episodes::issue_token))
        .route("/episodes/resolve", get(episodes::resolve_episode))
        .route(
            "/catalog/ingest",
            post(catalog::ingest_catalog).layer(DefaultBodyLimit::max(MAX_INGEST_BODY_BYTES)),
        )
        .route("/system/status", get(system::get_status))
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
}
