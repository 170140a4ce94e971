pub mod prelude;

pub mod catalog_anime;
