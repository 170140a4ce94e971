pub mod anime;

pub use anime::{Anime, Episode, PublicAnime, PublicEpisode, PublicSeason, Season, Section};
