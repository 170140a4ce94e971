use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{VIDEO_EXTENSION, catalog::EPISODE_NAME_PREFIX};
use crate::domain::EpisodeReference;

/// Which part of the source text a title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Airing,
    Finished,
}

impl Section {
    #[must_use]
    pub const fn is_airing(self) -> bool {
        matches!(self, Self::Airing)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Airing => "airing",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "airing" => Ok(Self::Airing),
            "finished" => Ok(Self::Finished),
            other => Err(format!(
                "Unknown section '{other}'. Expected 'airing' or 'finished'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anime {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub day: Option<String>,
    pub is_airing: bool,
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season_number: u32,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub episode_number: u32,
    pub name: String,
    pub video_url: String,
    pub file_name: String,
}

impl Episode {
    /// Builds an episode with the synthesized display name and file name.
    #[must_use]
    pub fn new(season_number: u32, episode_number: u32, video_url: impl Into<String>) -> Self {
        Self {
            episode_number,
            name: format!("{EPISODE_NAME_PREFIX} {episode_number}"),
            video_url: video_url.into(),
            file_name: format!("{season_number}x{episode_number:02}.{VIDEO_EXTENSION}"),
        }
    }
}

impl Anime {
    #[must_use]
    pub fn season(&self, season_number: u32) -> Option<&Season> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
    }

    #[must_use]
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

impl Season {
    #[must_use]
    pub fn episode(&self, episode_number: u32) -> Option<&Episode> {
        self.episodes
            .iter()
            .find(|e| e.episode_number == episode_number)
    }
}

/// Listing view of an [`Anime`]. Carries no video URLs; each episode exposes
/// the reference a client exchanges for a playback token instead.
#[derive(Debug, Clone, Serialize)]
pub struct PublicAnime {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub day: Option<String>,
    pub is_airing: bool,
    pub seasons: Vec<PublicSeason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicSeason {
    pub season_number: u32,
    pub episodes: Vec<PublicEpisode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicEpisode {
    pub episode_number: u32,
    pub name: String,
    pub file_name: String,
    pub reference: String,
}

impl From<&Anime> for PublicAnime {
    fn from(anime: &Anime) -> Self {
        let seasons = anime
            .seasons
            .iter()
            .map(|season| PublicSeason {
                season_number: season.season_number,
                episodes: season
                    .episodes
                    .iter()
                    .map(|episode| PublicEpisode {
                        episode_number: episode.episode_number,
                        name: episode.name.clone(),
                        file_name: episode.file_name.clone(),
                        reference: EpisodeReference::new(
                            anime.id.clone(),
                            season.season_number,
                            episode.episode_number,
                        )
                        .encode(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: anime.id.clone(),
            name: anime.name.clone(),
            year: anime.year,
            day: anime.day.clone(),
            is_airing: anime.is_airing,
            seasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Anime {
        Anime {
            id: "naruto".to_string(),
            name: "Naruto".to_string(),
            year: 2012,
            day: Some("Lunes".to_string()),
            is_airing: true,
            seasons: vec![Season {
                season_number: 1,
                episodes: vec![Episode::new(1, 1, "http://cdn/x.mp4")],
            }],
        }
    }

    #[test]
    fn test_episode_synthesized_fields() {
        let episode = Episode::new(2, 7, "http://cdn/y.mp4");
        assert_eq!(episode.name, "Episodio 7");
        assert_eq!(episode.file_name, "2x07.mp4");

        let episode = Episode::new(1, 123, "u");
        assert_eq!(episode.file_name, "1x123.mp4");
    }

    #[test]
    fn test_public_view_strips_video_url() {
        let public = PublicAnime::from(&sample());
        let json = serde_json::to_string(&public).unwrap();

        assert!(!json.contains("video_url"));
        assert!(!json.contains("http://cdn/x.mp4"));
        assert_eq!(public.seasons[0].episodes[0].reference, "naruto-1-1");
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("airing".parse::<Section>(), Ok(Section::Airing));
        assert_eq!(" Finished ".parse::<Section>(), Ok(Section::Finished));
        assert!("ongoing".parse::<Section>().is_err());
    }

    #[test]
    fn test_lookup_helpers() {
        let anime = sample();
        assert_eq!(anime.episode_count(), 1);
        assert!(anime.season(1).and_then(|s| s.episode(1)).is_some());
        assert!(anime.season(2).is_none());
    }
}
