pub mod catalog;
pub mod slug;

pub use catalog::{ParseStats, ParsedCatalog, parse_catalog};
pub use slug::slugify;
