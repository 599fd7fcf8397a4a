//! Keyword-based intent extraction for free-text messages.
//!
//! There is no language model here: recommendation keywords are searched
//! anywhere in the text, search keywords only as a prefix, and the first rule
//! that applies wins. Keywords within a rule are tried longest first so that
//! "rekomendasiin" is never half-removed as "rekomendasi".
//!
//! Known limitation: genre extraction takes at most two words after a genre
//! marker (or the whole remainder without one), so multi-word genres followed
//! by filler words are not recognized. Search keywords are a plain prefix,
//! so "carikan aku teman" searches for "kan aku teman".
//!
//! Besides "movie", the filler list also drops "movies" and "film", since
//! users mix English with Indonesian ("rekomendasi horror film").

/// What a free-text message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Title search with the query text as the user typed it
    Search {
        /// Text to search for
        query: String,
    },
    /// Recommendation, optionally restricted to a genre (lower-cased)
    Recommend {
        /// Requested genre name, if any
        genre: Option<String>,
    },
    /// No rule matched
    None,
}

/// Phrases that ask for recommendations, matched anywhere in the text
const RECOMMEND_KEYWORDS: &[&str] = &[
    "rekomendasiin film",
    "rekomendasiin",
    "rekomendasi film",
    "rekomendasi",
    "saranin film",
    "saranin",
    "recommend me",
    "recommend",
];

/// Phrases that start a title search, matched only as a prefix
const SEARCH_KEYWORDS: &[&str] = &[
    "cariin film",
    "cariin",
    "cari film",
    "cari judul",
    "cari",
    "search",
];

/// Words that announce the genre name
const GENRE_MARKERS: &[&str] = &["genre", "jenis", "type"];

/// Words dropped from a marker-less genre remainder
const FILLER_WORDS: &[&str] = &["movie", "movies", "film"];

/// How the parameters of an intent are read from the text
#[derive(Debug, Clone, Copy)]
enum Extraction {
    /// Remove the keyword anywhere, then read an optional genre
    GenreRemainder,
    /// Strip the keyword prefix, the rest is the query
    PrefixQuery,
}

struct Rule {
    keywords: &'static [&'static str],
    extraction: Extraction,
}

/// Rules in priority order
const RULES: &[Rule] = &[
    Rule {
        keywords: RECOMMEND_KEYWORDS,
        extraction: Extraction::GenreRemainder,
    },
    Rule {
        keywords: SEARCH_KEYWORDS,
        extraction: Extraction::PrefixQuery,
    },
];

/// Maps free text to an [`Intent`].
///
/// # Examples
///
/// ```
/// use cinebot::intent::{extract, Intent};
///
/// assert_eq!(
///     extract("cariin film Inception"),
///     Intent::Search { query: "Inception".to_string() }
/// );
/// assert_eq!(extract("cariin film"), Intent::None);
/// ```
#[must_use]
pub fn extract(text: &str) -> Intent {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();

    for rule in RULES {
        let matched = match rule.extraction {
            Extraction::GenreRemainder => extract_recommendation(&lowered, rule.keywords),
            Extraction::PrefixQuery => extract_search(trimmed, &lowered, rule.keywords),
        };
        if let Some(intent) = matched {
            return intent;
        }
    }
    Intent::None
}

fn by_length_desc(keywords: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = keywords.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()));
    sorted
}

fn extract_recommendation(lowered: &str, keywords: &[&'static str]) -> Option<Intent> {
    let keyword = by_length_desc(keywords)
        .into_iter()
        .find(|k| lowered.contains(k))?;
    let remainder = lowered.replacen(keyword, " ", 1);
    Some(Intent::Recommend {
        genre: genre_from_remainder(&remainder),
    })
}

fn genre_from_remainder(remainder: &str) -> Option<String> {
    let words: Vec<&str> = remainder.split_whitespace().collect();

    if let Some(marker) = words.iter().position(|w| GENRE_MARKERS.contains(w)) {
        let mut genre: Vec<&str> = Vec::with_capacity(2);
        if let Some(first) = words.get(marker + 1) {
            genre.push(*first);
            if let Some(second) = words.get(marker + 2).filter(|w| !is_keyword(w)) {
                genre.push(*second);
            }
        }
        return (!genre.is_empty()).then(|| genre.join(" "));
    }

    let genre: Vec<&str> = words
        .into_iter()
        .filter(|w| !FILLER_WORDS.contains(w))
        .collect();
    (!genre.is_empty()).then(|| genre.join(" "))
}

/// Words that never belong to a genre name
fn is_keyword(word: &str) -> bool {
    GENRE_MARKERS.contains(&word)
        || FILLER_WORDS.contains(&word)
        || RECOMMEND_KEYWORDS
            .iter()
            .chain(SEARCH_KEYWORDS)
            .any(|k| !k.contains(' ') && *k == word)
}

fn extract_search(original: &str, lowered: &str, keywords: &[&'static str]) -> Option<Intent> {
    let keyword = by_length_desc(keywords)
        .into_iter()
        .find(|k| lowered.starts_with(k))?;

    // Lower-casing can change byte lengths; slice the original by characters
    let skip = keyword.chars().count();
    let query: String = original.chars().skip(skip).collect();
    let query = query.trim();

    // An empty remainder falls through to Intent::None
    (!query.is_empty()).then(|| Intent::Search {
        query: query.to_string(),
    })
}
