pub use super::catalog_anime::Entity as CatalogAnime;
