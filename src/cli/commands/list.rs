//! List anime command handler

use crate::config::Config;
use crate::db::{CatalogStore, Store};

pub async fn cmd_list_anime(config: &Config, airing: Option<bool>) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let anime_list = match airing {
        Some(is_airing) => store.list_by_airing(is_airing).await?,
        None => store.list_all().await?,
    };

    if anime_list.is_empty() {
        println!("No anime in the catalog.");
        println!();
        println!("Load the catalog with: anicatalog ingest");
        return Ok(());
    }

    println!("Catalog ({} total)", anime_list.len());
    println!("{:-<70}", "");

    for anime in anime_list {
        let status_indicator = if anime.is_airing { "🟢" } else { "✓" };
        let day = anime
            .day
            .as_deref()
            .map(|d| format!(" | Day: {d}"))
            .unwrap_or_default();

        println!("{} {} ({})", status_indicator, anime.name, anime.year);
        println!(
            "  ID: {} | Seasons: {} | Episodes: {}{}",
            anime.id,
            anime.seasons.len(),
            anime.episode_count(),
            day
        );
    }

    println!();
    println!("Legend: 🟢 Airing | ✓ Finished");

    Ok(())
}
