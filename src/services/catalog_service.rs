//! Public read side of the catalog. Nothing returned from here carries a
//! video URL.

use std::sync::Arc;

use crate::db::CatalogStore;
use crate::models::anime::PublicAnime;

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Lists the catalog, optionally restricted to airing or finished titles.
    pub async fn list_public(&self, airing: Option<bool>) -> anyhow::Result<Vec<PublicAnime>> {
        let anime = match airing {
            Some(is_airing) => self.store.list_by_airing(is_airing).await?,
            None => self.store.list_all().await?,
        };
        Ok(anime.iter().map(PublicAnime::from).collect())
    }

    pub async fn get_public(&self, id: &str) -> anyhow::Result<Option<PublicAnime>> {
        Ok(self
            .store
            .find_by_id(id)
            .await?
            .as_ref()
            .map(PublicAnime::from))
    }
}
