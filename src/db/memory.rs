//! In-memory [`CatalogStore`] for unit tests.

use super::CatalogStore;
use crate::models::anime::Anime;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Anime>>,
}

impl MemoryStore {
    pub fn with_records(records: impl IntoIterator<Item = Anime>) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for anime in records {
                map.insert(anime.id.clone(), anime);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Anime>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn upsert_by_id(&self, id: &str, anime: &Anime) -> Result<()> {
        self.records
            .lock()
            .unwrap()
            .insert(id.to_string(), anime.clone());
        Ok(())
    }

    async fn list_by_airing(&self, is_airing: bool) -> Result<Vec<Anime>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.is_airing == is_airing)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Anime>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}
