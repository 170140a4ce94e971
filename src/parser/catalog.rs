//! Line-oriented parser for the catalog source text.
//!
//! Each non-blank line is classified by two grammar rules:
//!
//! - a **title line** (`<name> <year>` plus an optional `(<day>)` in the airing
//!   section) opens a new anime and makes it the current context;
//! - an **episode line** (`[prefix] <season>x<episode>[.mp4]|<url>`) adds an
//!   episode to the current anime.
//!
//! Lines matching neither rule, and episode lines seen before any title, are
//! skipped without failing the run.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::slug::slugify;
use crate::models::anime::{Anime, Episode, Season, Section};

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLine<'a> {
    pub name: &'a str,
    pub year: i32,
    pub day: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeLine<'a> {
    pub season_number: u32,
    pub episode_number: u32,
    pub video_url: &'a str,
}

/// Matches a title line for the given section.
///
/// The day group is only recognized in the airing section; in the finished
/// section a trailing `(<day>)` makes the line unmatched.
#[must_use]
pub fn parse_title_line(line: &str, section: Section) -> Option<TitleLine<'_>> {
    static AIRING: OnceLock<Regex> = OnceLock::new();
    static FINISHED: OnceLock<Regex> = OnceLock::new();

    let re = match section {
        Section::Airing => get_regex(
            &AIRING,
            r"^(?P<name>.+?)\s+(?P<year>\d{4})(?:\s*\(\s*(?P<day>[^()]*?)\s*\))?$",
        ),
        Section::Finished => get_regex(&FINISHED, r"^(?P<name>.+?)\s+(?P<year>\d{4})$"),
    };

    let caps = re.captures(line.trim())?;
    let name = caps.name("name")?.as_str().trim();
    if name.is_empty() {
        return None;
    }

    Some(TitleLine {
        name,
        year: caps.name("year")?.as_str().parse().ok()?,
        day: caps
            .name("day")
            .map(|m| m.as_str())
            .filter(|day| !day.is_empty()),
    })
}

/// Matches an episode line. Season and episode numbers must be positive.
#[must_use]
pub fn parse_episode_line(line: &str) -> Option<EpisodeLine<'_>> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(
        &RE,
        r"^.*?(?P<season>\d+)x(?P<episode>\d+)(?:\.mp4)?\s*\|\s*(?P<url>\S.*)$",
    );

    let caps = re.captures(line.trim())?;
    let season_number: u32 = caps.name("season")?.as_str().parse().ok()?;
    let episode_number: u32 = caps.name("episode")?.as_str().parse().ok()?;

    if season_number == 0 || episode_number == 0 {
        return None;
    }

    Some(EpisodeLine {
        season_number,
        episode_number,
        video_url: caps.name("url")?.as_str(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines: usize,
    pub blank: usize,
    pub titles: usize,
    pub episodes: usize,
    pub skipped: usize,
    pub replaced_titles: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    pub anime: Vec<Anime>,
    pub stats: ParseStats,
}

/// Parses one section of catalog text into fully built, ordered records.
///
/// Anime appear in order of first occurrence of their id. A title whose slug
/// was already seen replaces the earlier record, dropping its episodes.
#[must_use]
pub fn parse_catalog(text: &str, section: Section) -> ParsedCatalog {
    let mut builder = CatalogBuilder::new(section);
    for (index, line) in text.lines().enumerate() {
        builder.feed(index + 1, line);
    }
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineContext {
    NoContext,
    InContext(usize),
}

struct AnimeDraft {
    id: String,
    name: String,
    year: i32,
    day: Option<String>,
    seasons: BTreeMap<u32, BTreeMap<u32, Episode>>,
}

struct CatalogBuilder {
    section: Section,
    context: LineContext,
    drafts: Vec<AnimeDraft>,
    index_by_id: HashMap<String, usize>,
    stats: ParseStats,
}

impl CatalogBuilder {
    fn new(section: Section) -> Self {
        Self {
            section,
            context: LineContext::NoContext,
            drafts: Vec::new(),
            index_by_id: HashMap::new(),
            stats: ParseStats::default(),
        }
    }

    fn feed(&mut self, line_number: usize, raw: &str) {
        self.stats.lines += 1;

        let line = raw.trim();
        if line.is_empty() {
            self.stats.blank += 1;
            return;
        }

        if let Some(title) = parse_title_line(line, self.section) {
            self.start_anime(&title);
            return;
        }

        if let LineContext::InContext(index) = self.context
            && line.contains('|')
            && let Some(episode) = parse_episode_line(line)
        {
            self.add_episode(index, &episode);
            return;
        }

        self.stats.skipped += 1;
        trace!(line = line_number, content = line, "Skipping unmatched catalog line");
    }

    fn start_anime(&mut self, title: &TitleLine<'_>) {
        let id = slugify(title.name);
        let draft = AnimeDraft {
            id: id.clone(),
            name: title.name.to_string(),
            year: title.year,
            day: title.day.map(str::to_string),
            seasons: BTreeMap::new(),
        };

        let index = if let Some(&existing) = self.index_by_id.get(&id) {
            debug!(id = %id, "Title reuses an existing id, replacing earlier record");
            self.stats.replaced_titles += 1;
            self.drafts[existing] = draft;
            existing
        } else {
            self.drafts.push(draft);
            let index = self.drafts.len() - 1;
            self.index_by_id.insert(id, index);
            index
        };

        self.stats.titles += 1;
        self.context = LineContext::InContext(index);
    }

    fn add_episode(&mut self, index: usize, line: &EpisodeLine<'_>) {
        let draft = &mut self.drafts[index];
        let previous = draft
            .seasons
            .entry(line.season_number)
            .or_default()
            .insert(
                line.episode_number,
                Episode::new(line.season_number, line.episode_number, line.video_url),
            );

        if previous.is_some() {
            debug!(
                id = %draft.id,
                season = line.season_number,
                episode = line.episode_number,
                "Duplicate episode line, keeping the later one"
            );
        }
        self.stats.episodes += 1;
    }

    fn finish(self) -> ParsedCatalog {
        let is_airing = self.section.is_airing();
        let anime = self
            .drafts
            .into_iter()
            .map(|draft| Anime {
                id: draft.id,
                name: draft.name,
                year: draft.year,
                day: draft.day,
                is_airing,
                seasons: draft
                    .seasons
                    .into_iter()
                    .map(|(season_number, episodes)| Season {
                        season_number,
                        episodes: episodes.into_values().collect(),
                    })
                    .collect(),
            })
            .collect();

        ParsedCatalog {
            anime,
            stats: self.stats,
        }
    }
}
