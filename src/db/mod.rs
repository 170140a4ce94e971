use crate::config::GeneralConfig;
use crate::models::anime::Anime;
use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[cfg(test)]
pub mod memory;
pub mod migrator;
pub mod repositories;

/// Read/write contract the catalog core needs from its document store.
///
/// Upserts replace the whole record stored under `id`; implementations must
/// make that replacement atomic per record.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Anime>>;

    async fn upsert_by_id(&self, id: &str, anime: &Anime) -> Result<()>;

    async fn list_by_airing(&self, is_airing: bool) -> Result<Vec<Anime>>;

    async fn list_all(&self) -> Result<Vec<Anime>>;
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    /// Connects with the database URL and pool sizes from `[general]`.
    pub async fn from_config(general: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &general.database_path,
            general.max_db_connections,
            general.min_db_connections,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url
            .trim_start_matches("sqlite:")
            .split('?')
            .next()
            .unwrap_or_default();
        if !path_str.is_empty() && path_str != ":memory:" {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    pub async fn count_anime(&self) -> Result<u64> {
        self.anime_repo().count().await
    }
}

#[async_trait]
impl CatalogStore for Store {
    async fn find_by_id(&self, id: &str) -> Result<Option<Anime>> {
        self.anime_repo().get(id).await
    }

    async fn upsert_by_id(&self, id: &str, anime: &Anime) -> Result<()> {
        self.anime_repo().upsert(id, anime).await
    }

    async fn list_by_airing(&self, is_airing: bool) -> Result<Vec<Anime>> {
        self.anime_repo().list_by_airing(is_airing).await
    }

    async fn list_all(&self) -> Result<Vec<Anime>> {
        self.anime_repo().list_all().await
    }
}
