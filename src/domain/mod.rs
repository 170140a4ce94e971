//! Domain primitives shared by the catalog and playback layers.
//!
//! The main type here is [`EpisodeReference`], the composite key that names a
//! single episode as `<anime_id>-<season>-<episode>`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::catalog::REFERENCE_SEPARATOR;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Malformed episode reference: '{0}'")]
    Malformed(String),
}

/// Identifies one episode of one anime.
///
/// Anime ids are slugs and may contain the separator themselves, so decoding
/// reads the episode and season numbers from the right and keeps everything
/// before them as the id.
///
/// # Examples
///
/// ```rust
/// use anicatalog::domain::EpisodeReference;
///
/// let reference = EpisodeReference::new("shingeki-no-kyojin", 3, 12);
/// assert_eq!(reference.encode(), "shingeki-no-kyojin-3-12");
///
/// let decoded = EpisodeReference::decode("shingeki-no-kyojin-3-12").unwrap();
/// assert_eq!(decoded, reference);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EpisodeReference {
    pub anime_id: String,
    pub season_number: u32,
    pub episode_number: u32,
}

impl EpisodeReference {
    #[must_use]
    pub fn new(anime_id: impl Into<String>, season_number: u32, episode_number: u32) -> Self {
        Self {
            anime_id: anime_id.into(),
            season_number,
            episode_number,
        }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(reference: &str) -> Result<Self, ReferenceError> {
        let malformed = || ReferenceError::Malformed(reference.to_string());

        let (rest, episode) = reference
            .rsplit_once(REFERENCE_SEPARATOR)
            .ok_or_else(malformed)?;
        let (anime_id, season) = rest.rsplit_once(REFERENCE_SEPARATOR).ok_or_else(malformed)?;

        if anime_id.is_empty() {
            return Err(malformed());
        }

        Ok(Self {
            anime_id: anime_id.to_string(),
            season_number: parse_digits(season).ok_or_else(malformed)?,
            episode_number: parse_digits(episode).ok_or_else(malformed)?,
        })
    }
}

// `u32::from_str` accepts a leading `+`; references only carry bare digit runs.
fn parse_digits(segment: &str) -> Option<u32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl fmt::Display for EpisodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.anime_id,
            self.season_number,
            self.episode_number,
            sep = REFERENCE_SEPARATOR
        )
    }
}

impl FromStr for EpisodeReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
