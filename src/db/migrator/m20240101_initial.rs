use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CatalogAnime::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogAnime::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogAnime::Name).string().not_null())
                    .col(ColumnDef::new(CatalogAnime::Year).integer().not_null())
                    .col(ColumnDef::new(CatalogAnime::Day).string().null())
                    .col(
                        ColumnDef::new(CatalogAnime::IsAiring)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CatalogAnime::SeasonsJson)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogAnime::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_catalog_anime_is_airing")
                    .table(CatalogAnime::Table)
                    .col(CatalogAnime::IsAiring)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CatalogAnime::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CatalogAnime {
    Table,
    Id,
    Name,
    Year,
    Day,
    IsAiring,
    SeasonsJson,
    UpdatedAt,
}
