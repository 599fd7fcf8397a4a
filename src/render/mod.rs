//! Response rendering
//!
//! Turns movies into [`DisplayPayload`]s: Telegram HTML text (or a photo
//! caption), an optional image, and follow-up buttons carrying
//! [`ActionToken`]s. Every payload can be downgraded to plain text with the
//! same buttons if Telegram rejects the markup.

pub mod view;

use crate::actions::{ActionKind, ActionToken};
use crate::config::{
    LIST_LIMIT, OVERVIEW_LIMIT, TAGLINE_LIMIT, TELEGRAM_CAPTION_LIMIT, TELEGRAM_MESSAGE_LIMIT,
};
use crate::tmdb::{MovieDetail, MovieSummary};
use crate::utils::{char_len, escape_html, strip_html, truncate_with_ellipsis};
use view::{DefaultMovieView, MovieView};

const UNKNOWN_TITLE: &str = "Judul tidak diketahui";
const UNKNOWN_VALUE: &str = "Tidak diketahui";
const NOT_AVAILABLE: &str = "N/A";

/// How the payload text must be parsed by Telegram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    /// Telegram HTML parse mode
    Html,
    /// No parse mode
    Plain,
}

/// A follow-up button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub token: ActionToken,
}

impl Action {
    #[must_use]
    pub fn new(label: impl Into<String>, kind: ActionKind, movie_id: u64) -> Self {
        Self {
            label: label.into(),
            token: ActionToken::new(kind, movie_id),
        }
    }
}

/// Rendered output for one turn, used for new messages and edits alike.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPayload {
    pub text: String,
    pub format: TextFormat,
    /// When set, the image is the message and `text` is its caption
    pub image_url: Option<String>,
    pub actions: Vec<Action>,
}

impl DisplayPayload {
    /// HTML text message without buttons
    #[must_use]
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            image_url: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_image(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    /// Character limit the text must fit: caption when there is an image.
    #[must_use]
    pub fn text_limit(&self) -> usize {
        if self.image_url.is_some() {
            TELEGRAM_CAPTION_LIMIT
        } else {
            TELEGRAM_MESSAGE_LIMIT
        }
    }

    /// Same payload with all formatting removed, for resending after Telegram
    /// rejected the markup.
    #[must_use]
    pub fn to_plain(&self) -> Self {
        let text = match self.format {
            TextFormat::Html => strip_html(&self.text),
            TextFormat::Plain => self.text.clone(),
        };
        Self {
            text: crate::utils::truncate_str(text, self.text_limit()),
            format: TextFormat::Plain,
            image_url: self.image_url.clone(),
            actions: self.actions.clone(),
        }
    }
}

/// Renders movies into payloads.
#[derive(Debug, Clone)]
pub struct MovieRenderer {
    image_base_url: String,
}

impl MovieRenderer {
    /// `image_base_url` is the TMDB image prefix, e.g. `https://image.tmdb.org/t/p/w500`.
    #[must_use]
    pub fn new(image_base_url: &str) -> Self {
        Self {
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full image URL for a TMDB `poster_path`.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        format!("{}/{}", self.image_base_url, path.trim_start_matches('/'))
    }

    /// Detail view of a single movie.
    ///
    /// `intro` is HTML placed above the title. When the movie has a poster
    /// the text becomes a photo caption, and the overview, then the tagline,
    /// are shortened further if needed to fit the caption limit. Titles and
    /// labels are never cut.
    #[must_use]
    pub fn render_detail(&self, detail: &MovieDetail, intro: Option<&str>) -> DisplayPayload {
        let image_url = detail
            .summary
            .poster_path
            .as_deref()
            .map(|path| self.image_url(path));
        let limit = if image_url.is_some() {
            TELEGRAM_CAPTION_LIMIT
        } else {
            TELEGRAM_MESSAGE_LIMIT
        };

        // The overview gives way first, then the tagline
        let mut budget = TextBudget {
            overview: OVERVIEW_LIMIT,
            tagline: TAGLINE_LIMIT,
        };
        let mut text = detail_text(detail, intro, budget);
        while char_len(&text) > limit && !budget.is_exhausted() {
            budget.shrink(char_len(&text) - limit);
            text = detail_text(detail, intro, budget);
        }

        DisplayPayload::html(text)
            .with_image(image_url)
            .with_actions(detail_actions(detail.summary.id))
    }

    /// List view: the intro line plus one `Title (Year)` button per movie,
    /// for at most the first five movies.
    #[must_use]
    pub fn render_list(&self, movies: &[MovieSummary], intro: &str) -> DisplayPayload {
        if movies.is_empty() {
            return DisplayPayload::html(DefaultMovieView::nothing_found());
        }

        let actions = movies
            .iter()
            .take(LIST_LIMIT)
            .map(|movie| Action::new(list_label(movie), ActionKind::Select, movie.id))
            .collect();

        DisplayPayload::html(intro).with_actions(actions)
    }
}

fn detail_actions(movie_id: u64) -> Vec<Action> {
    if movie_id == 0 {
        return Vec::new();
    }
    vec![
        Action::new(DefaultMovieView::trailer_button(), ActionKind::Trailer, movie_id),
        Action::new(DefaultMovieView::cast_button(), ActionKind::Cast, movie_id),
        Action::new(DefaultMovieView::similar_button(), ActionKind::Similar, movie_id),
    ]
}

/// Button label: `Title (Year)`, or `Title (N/A)` without a release date.
#[must_use]
pub fn list_label(movie: &MovieSummary) -> String {
    format!(
        "{} ({})",
        display_title(movie),
        movie.release_year().unwrap_or(NOT_AVAILABLE)
    )
}

fn display_title(movie: &MovieSummary) -> &str {
    if movie.title.trim().is_empty() {
        UNKNOWN_TITLE
    } else {
        &movie.title
    }
}

/// Characters left for the provider texts that may be cut
#[derive(Debug, Clone, Copy)]
struct TextBudget {
    overview: usize,
    tagline: usize,
}

impl TextBudget {
    const fn is_exhausted(self) -> bool {
        self.overview == 0 && self.tagline == 0
    }

    fn shrink(&mut self, overflow: usize) {
        let overflow = overflow.max(1);
        if self.overview > 0 {
            self.overview = self.overview.saturating_sub(overflow);
        } else {
            self.tagline = self.tagline.saturating_sub(overflow);
        }
    }
}

fn detail_text(detail: &MovieDetail, intro: Option<&str>, budget: TextBudget) -> String {
    let summary = &detail.summary;
    let mut lines: Vec<String> = Vec::with_capacity(12);

    if let Some(intro) = intro {
        lines.push(intro.to_string());
        lines.push(String::new());
    }

    lines.push(format!("🎬 <b>{}</b>", escape_html(display_title(summary))));
    if let Some(tagline) = detail
        .tagline
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty() && budget.tagline > 0)
    {
        let tagline = truncate_with_ellipsis(tagline, budget.tagline);
        lines.push(format!("<i>{}</i>", escape_html(&tagline)));
    }
    lines.push(String::new());

    lines.push(format!(
        "🗓️ Rilis: {}",
        escape_html(summary.release_date.as_deref().unwrap_or(UNKNOWN_VALUE))
    ));
    lines.push(format!("⭐ Rating: {}", format_rating(summary.vote_average)));
    lines.push(format!("🎭 Genre: {}", escape_html(&genre_names(detail))));
    lines.push(format!(
        "⏱️ Durasi: {}",
        detail
            .runtime_minutes
            .filter(|m| *m > 0)
            .map_or_else(|| NOT_AVAILABLE.to_string(), |m| format!("{m} menit"))
    ));
    lines.push(format!(
        "🌐 Bahasa: {}",
        escape_html(&language_code(&detail.original_language))
    ));
    lines.push(String::new());

    let overview = if summary.overview.trim().is_empty() {
        "Sinopsis tidak tersedia".to_string()
    } else {
        truncate_with_ellipsis(summary.overview.trim(), budget.overview)
    };
    lines.push(format!("📝 {}", escape_html(&overview)));

    lines.join("\n")
}

/// `X.X/10` for a positive rating, `N/A` otherwise.
#[must_use]
pub fn format_rating(vote_average: Option<f64>) -> String {
    vote_average
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.1}/10"))
}

fn genre_names(detail: &MovieDetail) -> String {
    let names: Vec<&str> = detail
        .genres
        .iter()
        .map(|g| g.name.as_str())
        .filter(|name| !name.trim().is_empty())
        .collect();
    if names.is_empty() {
        UNKNOWN_VALUE.to_string()
    } else {
        names.join(", ")
    }
}

fn language_code(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        code.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{Genre, Video};

    fn renderer() -> MovieRenderer {
        MovieRenderer::new("https://image.tmdb.org/t/p/w500/")
    }

    fn detail(overview: &str) -> MovieDetail {
        MovieDetail {
            summary: MovieSummary {
                id: 27205,
                title: "Inception".to_string(),
                overview: overview.to_string(),
                release_date: Some("2010-07-15".to_string()),
                poster_path: None,
                vote_average: Some(7.5),
                genre_ids: vec![28],
            },
            runtime_minutes: Some(148),
            genres: vec![
                Genre {
                    id: 28,
                    name: "Action".to_string(),
                },
                Genre {
                    id: 878,
                    name: "Science Fiction".to_string(),
                },
            ],
            tagline: Some("Your mind is the scene of the crime.".to_string()),
            original_language: "en".to_string(),
            videos: vec![Video {
                site: "YouTube".to_string(),
                kind: "Trailer".to_string(),
                key: "YoHD9XEInc0".to_string(),
            }],
            cast: Vec::new(),
        }
    }

    fn summary(id: u64, title: &str, release_date: Option<&str>) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            release_date: release_date.map(str::to_string),
            ..MovieSummary::default()
        }
    }

    #[test]
    fn test_detail_field_order() {
        let payload = renderer().render_detail(&detail("A thief."), Some("Kamu memilih:"));
        let expected = "Kamu memilih:\n\n\
                        🎬 <b>Inception</b>\n\
                        <i>Your mind is the scene of the crime.</i>\n\n\
                        🗓️ Rilis: 2010-07-15\n\
                        ⭐ Rating: 7.5/10\n\
                        🎭 Genre: Action, Science Fiction\n\
                        ⏱️ Durasi: 148 menit\n\
                        🌐 Bahasa: EN\n\n\
                        📝 A thief.";
        assert_eq!(payload.text, expected);
        assert_eq!(payload.format, TextFormat::Html);
        assert!(payload.image_url.is_none());
    }

    #[test]
    fn test_rating_formatting() {
        let mut movie = detail("x");
        assert!(renderer().render_detail(&movie, None).text.contains("7.5/10"));

        movie.summary.vote_average = None;
        assert!(renderer().render_detail(&movie, None).text.contains("Rating: N/A"));

        movie.summary.vote_average = Some(0.0);
        assert!(renderer().render_detail(&movie, None).text.contains("Rating: N/A"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let movie = MovieDetail::from(summary(9, "Bare", None));
        let text = renderer().render_detail(&movie, None).text;
        assert!(text.contains("Rilis: Tidak diketahui"));
        assert!(text.contains("Genre: Tidak diketahui"));
        assert!(text.contains("Durasi: N/A"));
        assert!(text.contains("Bahasa: N/A"));
        assert!(!text.contains("<i>"));
    }

    #[test]
    fn test_overview_truncation_boundary() {
        let exact = "o".repeat(300);
        let text = renderer().render_detail(&detail(&exact), None).text;
        assert!(text.ends_with(&format!("📝 {exact}")));

        let over = "o".repeat(301);
        let text = renderer().render_detail(&detail(&over), None).text;
        assert!(text.ends_with(&format!("📝 {exact}...")));
    }

    #[test]
    fn test_provider_text_is_escaped_but_labels_are_not() {
        let mut movie = detail("Fast <cars> & furious");
        movie.summary.title = "Tom & Jerry".to_string();
        let text = renderer().render_detail(&movie, None).text;
        assert!(text.contains("<b>Tom &amp; Jerry</b>"));
        assert!(text.contains("Fast &lt;cars&gt; &amp; furious"));
    }

    #[test]
    fn test_detail_actions_encode_movie_id() {
        let payload = renderer().render_detail(&detail("x"), None);
        let tokens: Vec<String> = payload.actions.iter().map(|a| a.token.encode()).collect();
        assert_eq!(tokens, vec!["trailer:27205", "cast:27205", "similar:27205"]);

        let without_id = MovieDetail::from(summary(0, "Nameless", None));
        assert!(renderer().render_detail(&without_id, None).actions.is_empty());
    }

    #[test]
    fn test_poster_becomes_image_and_caption_fits() {
        let mut movie = detail(&"word ".repeat(100));
        movie.summary.poster_path = Some("/poster.jpg".to_string());
        movie.tagline = Some("t".repeat(600));

        let payload = renderer().render_detail(&movie, Some("Kamu memilih:"));
        assert_eq!(
            payload.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert!(char_len(&payload.text) <= TELEGRAM_CAPTION_LIMIT);
        assert!(payload.text.contains("<b>Inception</b>"));
        assert!(payload.text.contains("Rating: 7.5/10"));
    }

    #[test]
    fn test_long_tagline_is_cut_to_fit_caption() {
        let mut movie = detail(&"o".repeat(400));
        movie.summary.poster_path = Some("/poster.jpg".to_string());
        movie.tagline = Some("t".repeat(1200));

        let payload = renderer().render_detail(&movie, None);
        assert!(char_len(&payload.text) <= TELEGRAM_CAPTION_LIMIT);
        assert!(payload.text.contains("🎬 <b>Inception</b>"));
        assert!(payload
            .text
            .contains(&format!("<i>{}...</i>", "t".repeat(TAGLINE_LIMIT))));
    }

    #[test]
    fn test_tagline_gives_way_after_overview() {
        let title = "T".repeat(800);
        let mut movie = detail(&"o".repeat(400));
        movie.summary.title = title.clone();
        movie.summary.poster_path = Some("/poster.jpg".to_string());
        movie.tagline = Some("t".repeat(1200));

        let text = renderer().render_detail(&movie, None).text;
        assert!(char_len(&text) <= TELEGRAM_CAPTION_LIMIT);
        assert!(text.contains(&format!("<b>{title}</b>")));
        assert!(!text.contains(&"t".repeat(TAGLINE_LIMIT)));
    }

    #[test]
    fn test_tagline_capped_without_poster() {
        let mut movie = detail("Short.");
        movie.tagline = Some("t".repeat(TAGLINE_LIMIT + 1));

        let text = renderer().render_detail(&movie, None).text;
        assert!(text.contains(&format!("<i>{}...</i>", "t".repeat(TAGLINE_LIMIT))));
    }

    #[test]
    fn test_list_takes_first_five_in_order() {
        let movies: Vec<MovieSummary> = (1..=7)
            .map(|id| summary(id, &format!("Movie {id}"), Some("1999-03-31")))
            .collect();
        let payload = renderer().render_list(&movies, "Pilih:");

        assert_eq!(payload.text, "Pilih:");
        assert_eq!(payload.actions.len(), 5);
        let ids: Vec<u64> = payload.actions.iter().map(|a| a.token.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(payload
            .actions
            .iter()
            .all(|a| a.token.kind == ActionKind::Select));
        assert_eq!(payload.actions[0].label, "Movie 1 (1999)");
    }

    #[test]
    fn test_list_label_without_date() {
        assert_eq!(list_label(&summary(1, "Untitled", None)), "Untitled (N/A)");
        assert_eq!(list_label(&summary(1, "", Some("2024"))), "Judul tidak diketahui (2024)");
    }

    #[test]
    fn test_empty_list_has_no_actions() {
        let payload = renderer().render_list(&[], "Pilih:");
        assert!(payload.actions.is_empty());
        assert_eq!(payload.text, DefaultMovieView::nothing_found());
    }

    #[test]
    fn test_plain_fallback_keeps_buttons_and_image() {
        let mut movie = detail("Fast & furious");
        movie.summary.poster_path = Some("/p.jpg".to_string());
        let payload = renderer().render_detail(&movie, None);
        let plain = payload.to_plain();

        assert_eq!(plain.format, TextFormat::Plain);
        assert_eq!(plain.actions, payload.actions);
        assert_eq!(plain.image_url, payload.image_url);
        assert!(plain.text.contains("🎬 Inception"));
        assert!(plain.text.contains("Fast & furious"));
        assert!(!plain.text.contains("<b>"));
    }
}
