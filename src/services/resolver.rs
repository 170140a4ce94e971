//! Turns a verified episode reference into the playable video URL.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::db::CatalogStore;
use crate::domain::{EpisodeReference, ReferenceError};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    MalformedReference(#[from] ReferenceError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Catalog store error: {0}")]
    Store(String),
}

impl From<anyhow::Error> for ResolveError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEpisode {
    pub video_url: String,
    pub anime_name: String,
    pub episode_number: u32,
}

pub struct EpisodeResolver {
    store: Arc<dyn CatalogStore>,
}

impl EpisodeResolver {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Looks up the episode named by an already verified reference.
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedEpisode, ResolveError> {
        let reference = EpisodeReference::decode(reference)?;

        let anime = self
            .store
            .find_by_id(&reference.anime_id)
            .await?
            .ok_or_else(|| ResolveError::NotFound(format!("Anime '{}'", reference.anime_id)))?;

        let season = anime.season(reference.season_number).ok_or_else(|| {
            ResolveError::NotFound(format!(
                "Season {} of '{}'",
                reference.season_number, reference.anime_id
            ))
        })?;

        let episode = season.episode(reference.episode_number).ok_or_else(|| {
            ResolveError::NotFound(format!("Episode {reference}"))
        })?;

        Ok(ResolvedEpisode {
            video_url: episode.video_url.clone(),
            anime_name: anime.name.clone(),
            episode_number: episode.episode_number,
        })
    }
}
