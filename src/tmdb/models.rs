//! Typed views over TMDB JSON.
//!
//! Every field TMDB may omit or null has an explicit default, so a sparse
//! response degrades to "unknown" values instead of a deserialization error.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Genre id to display name, as returned by `/genre/movie/list`
pub type GenreMap = BTreeMap<u32, String>;

/// A movie as returned by search and list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie id; `0` means the provider did not send one
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    /// ISO date (`YYYY-MM-DD`); `None` when TMDB sends null or ""
    #[serde(default, deserialize_with = "blank_as_none")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
}

impl MovieSummary {
    /// Release year: the part of the release date before the first `-`.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.trim().is_empty())
    }

    /// Rating only when TMDB reports a positive score.
    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.vote_average.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// A named genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A video attached to a movie (trailer, teaser, clip...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default, deserialize_with = "null_as_default")]
    pub site: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub key: String,
}

impl Video {
    /// YouTube trailers and teasers are the only videos we link to.
    #[must_use]
    pub fn is_youtube_trailer(&self) -> bool {
        self.site.eq_ignore_ascii_case("youtube")
            && (self.kind.eq_ignore_ascii_case("trailer")
                || self.kind.eq_ignore_ascii_case("teaser"))
            && !self.key.is_empty()
    }

    #[must_use]
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.key)
    }
}

/// One billed cast entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
}

/// A summary enriched with the `/movie/{id}?append_to_response=videos,credits` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DetailWire")]
pub struct MovieDetail {
    pub summary: MovieSummary,
    /// Runtime in minutes, only when positive
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    /// Two-letter language code, may be empty
    pub original_language: String,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
}

impl MovieDetail {
    /// Builds a detail view from a summary when enrichment is not available.
    ///
    /// Genre names are resolved through `genres`; ids without a name are skipped.
    #[must_use]
    pub fn from_summary(summary: MovieSummary, genres: &GenreMap) -> Self {
        let genres = summary
            .genre_ids
            .iter()
            .filter_map(|id| {
                genres.get(id).map(|name| Genre {
                    id: *id,
                    name: name.clone(),
                })
            })
            .collect();
        Self {
            summary,
            genres,
            ..Self::default()
        }
    }

    /// First YouTube trailer or teaser, in provider order.
    #[must_use]
    pub fn trailer(&self) -> Option<&Video> {
        self.videos.iter().find(|v| v.is_youtube_trailer())
    }
}

impl From<MovieSummary> for MovieDetail {
    fn from(summary: MovieSummary) -> Self {
        Self::from_summary(summary, &GenreMap::new())
    }
}

/// Paged list envelope: `{ "results": [...] }`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ResultsPage<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

impl<T> Default for ResultsPage<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

/// `/genre/movie/list` envelope
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Default, Deserialize)]
struct Credits {
    #[serde(default, deserialize_with = "null_as_default")]
    cast: Vec<CastMember>,
}

#[derive(Debug, Deserialize)]
struct DetailWire {
    #[serde(default)]
    id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    overview: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    release_date: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    poster_path: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
    #[serde(default)]
    runtime: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    genres: Vec<Genre>,
    #[serde(default, deserialize_with = "blank_as_none")]
    tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    original_language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    videos: ResultsPage<Video>,
    #[serde(default, deserialize_with = "null_as_default")]
    credits: Credits,
}

impl From<DetailWire> for MovieDetail {
    fn from(wire: DetailWire) -> Self {
        let genre_ids = wire.genres.iter().map(|g| g.id).collect();
        Self {
            summary: MovieSummary {
                id: wire.id,
                title: wire.title,
                overview: wire.overview,
                release_date: wire.release_date,
                poster_path: wire.poster_path,
                vote_average: wire.vote_average,
                genre_ids,
            },
            runtime_minutes: wire
                .runtime
                .filter(|r| *r > 0)
                .and_then(|r| u32::try_from(r).ok()),
            genres: wire.genres,
            tagline: wire.tagline,
            original_language: wire.original_language,
            videos: wire.videos.results,
            cast: wire.credits.cast,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
