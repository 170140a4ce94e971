use crate::entities::{catalog_anime, prelude::*};
use crate::models::anime::{Anime, Season};
use anyhow::Context;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_anime(model: catalog_anime::Model) -> anyhow::Result<Anime> {
        let seasons: Vec<Season> = serde_json::from_str(&model.seasons_json)
            .with_context(|| format!("Corrupt seasons document for anime '{}'", model.id))?;

        Ok(Anime {
            id: model.id,
            name: model.name,
            year: model.year,
            day: model.day,
            is_airing: model.is_airing,
            seasons,
        })
    }

    /// Inserts the record or replaces every column of the existing row with
    /// the same id, in a single statement.
    pub async fn upsert(&self, id: &str, anime: &Anime) -> anyhow::Result<()> {
        let active_model = catalog_anime::ActiveModel {
            id: Set(id.to_string()),
            name: Set(anime.name.clone()),
            year: Set(anime.year),
            day: Set(anime.day.clone()),
            is_airing: Set(anime.is_airing),
            seasons_json: Set(serde_json::to_string(&anime.seasons)?),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        CatalogAnime::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(catalog_anime::Column::Id)
                    .update_columns([
                        catalog_anime::Column::Name,
                        catalog_anime::Column::Year,
                        catalog_anime::Column::Day,
                        catalog_anime::Column::IsAiring,
                        catalog_anime::Column::SeasonsJson,
                        catalog_anime::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        debug!(id = %id, "Upserted catalog anime");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Anime>> {
        CatalogAnime::find_by_id(id.to_string())
            .one(&self.conn)
            .await?
            .map(Self::map_model_to_anime)
            .transpose()
    }

    pub async fn list_by_airing(&self, is_airing: bool) -> anyhow::Result<Vec<Anime>> {
        let rows = CatalogAnime::find()
            .filter(catalog_anime::Column::IsAiring.eq(is_airing))
            .order_by_asc(catalog_anime::Column::Name)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::map_model_to_anime).collect()
    }

    pub async fn list_all(&self) -> anyhow::Result<Vec<Anime>> {
        let rows = CatalogAnime::find()
            .order_by_asc(catalog_anime::Column::Name)
            .all(&self.conn)
            .await?;

        rows.into_iter().map(Self::map_model_to_anime).collect()
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        use sea_orm::PaginatorTrait;
        Ok(CatalogAnime::find().count(&self.conn).await?)
    }
}
