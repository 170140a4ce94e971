//! Ingest command handler

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, SourceConfig};
use crate::db::Store;
use crate::models::Section;
use crate::services::{FixedIntervalThrottle, IngestReport, IngestService};

pub async fn cmd_ingest(
    config: &Config,
    file: Option<&str>,
    section: Option<Section>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let throttle = Arc::new(FixedIntervalThrottle::new(Duration::from_millis(
        config.ingest.upsert_interval_ms,
    )));
    let service = IngestService::new(Arc::new(store), throttle);

    let report = match (file, section) {
        (Some(path), Some(section)) => {
            service
                .ingest_file(Path::new(path), section, dry_run)
                .await?
        }
        (Some(_), None) => anyhow::bail!("--file needs --section airing|finished"),
        (None, section) => {
            let sources: Vec<SourceConfig> = match section {
                Some(section) => config.sources_for(section).into_iter().cloned().collect(),
                None => config.ingest.sources.clone(),
            };
            if sources.is_empty() {
                println!("No catalog sources configured.");
                println!("Add [[ingest.sources]] entries to config.toml or pass --file.");
                return Ok(());
            }
            service.ingest_sources(&sources, dry_run).await?
        }
    };

    print_report(&report, dry_run);
    Ok(())
}

fn print_report(report: &IngestReport, dry_run: bool) {
    if dry_run {
        println!("Dry run: nothing was written.");
    }
    println!("Sources:        {}", report.sources);
    println!("Anime:          {}", report.anime);
    println!("Seasons:        {}", report.seasons);
    println!("Episodes:       {}", report.episodes);
    println!("Skipped lines:  {}", report.skipped_lines);
    if report.replaced_titles > 0 {
        println!("Replaced ids:   {}", report.replaced_titles);
    }
    println!("Upserted:       {}", report.upserted);
}
