//! Parse-and-upsert cycle for the catalog source text.
//!
//! Every record from a parse run is written to the store in order, one at a
//! time. Writes are paced by a [`WriteThrottle`] so the parser itself never
//! deals with rate limits.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::db::CatalogStore;
use crate::models::anime::Section;
use crate::parser::{ParsedCatalog, parse_catalog};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read catalog source {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog store error while writing '{id}': {message}")]
    Store { id: String, message: String },
}

/// Paces consecutive store writes.
#[async_trait]
pub trait WriteThrottle: Send + Sync {
    async fn wait(&self);
}

/// Allows at most one write per fixed interval. A zero interval disables
/// pacing.
pub struct FixedIntervalThrottle {
    limiter: Option<DefaultDirectRateLimiter>,
}

impl FixedIntervalThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            limiter: Quota::with_period(interval).map(RateLimiter::direct),
        }
    }
}

#[async_trait]
impl WriteThrottle for FixedIntervalThrottle {
    async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub sources: usize,
    pub anime: usize,
    pub seasons: usize,
    pub episodes: usize,
    pub skipped_lines: usize,
    pub replaced_titles: usize,
    pub upserted: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: &Self) {
        self.sources += other.sources;
        self.anime += other.anime;
        self.seasons += other.seasons;
        self.episodes += other.episodes;
        self.skipped_lines += other.skipped_lines;
        self.replaced_titles += other.replaced_titles;
        self.upserted += other.upserted;
    }
}

pub struct IngestService {
    store: Arc<dyn CatalogStore>,
    throttle: Arc<dyn WriteThrottle>,
}

impl IngestService {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, throttle: Arc<dyn WriteThrottle>) -> Self {
        Self { store, throttle }
    }

    /// Parses `text` as one section and upserts every resulting record,
    /// unless `dry_run` is set.
    pub async fn ingest_text(
        &self,
        text: &str,
        section: Section,
        dry_run: bool,
    ) -> Result<IngestReport, IngestError> {
        let ParsedCatalog { anime, stats } = parse_catalog(text, section);

        let mut report = IngestReport {
            sources: 1,
            anime: anime.len(),
            seasons: anime.iter().map(|a| a.seasons.len()).sum(),
            episodes: anime.iter().map(crate::models::Anime::episode_count).sum(),
            skipped_lines: stats.skipped,
            replaced_titles: stats.replaced_titles,
            upserted: 0,
        };

        if stats.replaced_titles > 0 {
            warn!(
                section = %section,
                replaced = stats.replaced_titles,
                "Some titles reused an id and replaced earlier records"
            );
        }

        if dry_run {
            info!(section = %section, anime = report.anime, "Dry run, skipping store writes");
            return Ok(report);
        }

        for record in &anime {
            self.throttle.wait().await;
            self.store
                .upsert_by_id(&record.id, record)
                .await
                .map_err(|e| IngestError::Store {
                    id: record.id.clone(),
                    message: e.to_string(),
                })?;
            report.upserted += 1;
            metrics::counter!("catalog_ingested_anime_total", "section" => section.as_str())
                .increment(1);
        }

        info!(
            section = %section,
            anime = report.anime,
            episodes = report.episodes,
            skipped = report.skipped_lines,
            "Catalog section ingested"
        );

        Ok(report)
    }

    pub async fn ingest_file(
        &self,
        path: &Path,
        section: Section,
        dry_run: bool,
    ) -> Result<IngestReport, IngestError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| IngestError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), section = %section, "Ingesting catalog source");
        self.ingest_text(&text, section, dry_run).await
    }

    /// Ingests every configured source in order and sums the reports.
    pub async fn ingest_sources(
        &self,
        sources: &[SourceConfig],
        dry_run: bool,
    ) -> Result<IngestReport, IngestError> {
        let mut total = IngestReport::default();
        for source in sources {
            let report = self
                .ingest_file(Path::new(&source.path), source.section, dry_run)
                .await?;
            total.absorb(&report);
        }
        Ok(total)
    }
}
