//! Token issue/resolve command handlers

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::domain::EpisodeReference;
use crate::services::{EpisodeResolver, TokenService};

pub fn cmd_token(config: &Config, reference: &str) -> anyhow::Result<()> {
    let tokens = TokenService::new(&config.tokens);
    tokens.ensure_configured()?;

    let reference = reference.trim();
    EpisodeReference::decode(reference)?;

    let issued = tokens.issue(reference)?;

    println!("{}", issued.token);
    eprintln!("Expires at {}", issued.expires_at.to_rfc3339());
    Ok(())
}

pub async fn cmd_resolve(config: &Config, token: &str) -> anyhow::Result<()> {
    let reference = TokenService::new(&config.tokens).verify(token)?;

    let store = Store::from_config(&config.general).await?;
    let resolved = EpisodeResolver::new(Arc::new(store))
        .resolve(&reference)
        .await?;

    println!("{} - episode {}", resolved.anime_name, resolved.episode_number);
    println!("{}", resolved.video_url);
    Ok(())
}
