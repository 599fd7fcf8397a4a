//! Conversation orchestration
//!
//! One inbound event in, one [`DisplayPayload`] out. Nothing here knows about
//! Telegram: the transport hands over text or callback data and delivers
//! whatever comes back.

use crate::actions::{ActionDispatcher, ActionToken};
use crate::config::LIST_LIMIT;
use crate::intent::{self, Intent};
use crate::render::view::{DefaultMovieView, MovieView};
use crate::render::{DisplayPayload, MovieRenderer};
use crate::tmdb::{CatalogError, MovieCatalog, MovieDetail, MovieSummary};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name used in the welcome message when the sender is unknown
const FALLBACK_USER_NAME: &str = "kamu";

/// A slash command with its argument text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Start,
    Help,
    /// `/carijudul <judul>`
    Search(String),
    /// `/rekomendasi [genre]`
    Recommend(String),
    /// `/populer`
    Popular,
    /// `/toprated`
    TopRated,
    /// `/genre [nama]`
    Genre(String),
    /// Anything else starting with `/`
    Unknown(String),
}

/// Parses `/name@bot args` into a [`ChatCommand`].
///
/// Returns `None` when `text` is not a command at all.
#[must_use]
pub fn parse_command(text: &str) -> Option<ChatCommand> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(head, args)| (head, args.trim()));
    let name = head
        .split_once('@')
        .map_or(head, |(name, _bot)| name)
        .to_lowercase();
    let args = args.to_string();

    let command = match name.as_str() {
        "start" => ChatCommand::Start,
        "help" => ChatCommand::Help,
        "carijudul" => ChatCommand::Search(args),
        "rekomendasi" => ChatCommand::Recommend(args),
        "populer" => ChatCommand::Popular,
        "toprated" => ChatCommand::TopRated,
        "genre" => ChatCommand::Genre(args),
        _ => ChatCommand::Unknown(name),
    };
    Some(command)
}

/// `true` when `text` is a command with an `@username` suffix naming some
/// other bot. Commands without a suffix are for everyone in the chat.
///
/// # Examples
///
/// ```
/// use cinebot::conversation::is_addressed_to_other_bot;
///
/// assert!(is_addressed_to_other_bot("/carijudul@other_bot Up", "cine_bot"));
/// assert!(!is_addressed_to_other_bot("/carijudul@Cine_Bot Up", "cine_bot"));
/// assert!(!is_addressed_to_other_bot("/carijudul Up", "cine_bot"));
/// ```
#[must_use]
pub fn is_addressed_to_other_bot(text: &str, bot_username: &str) -> bool {
    let Some(rest) = text.trim().strip_prefix('/') else {
        return false;
    };
    let head = rest.split(char::is_whitespace).next().unwrap_or_default();
    head.split_once('@')
        .is_some_and(|(_, addressee)| {
            !addressee.is_empty() && !addressee.eq_ignore_ascii_case(bot_username)
        })
}

/// Wires intent extraction, the catalog, rendering, and action dispatch.
pub struct Conversation {
    catalog: Arc<MovieCatalog>,
    renderer: Arc<MovieRenderer>,
    actions: ActionDispatcher,
}

impl Conversation {
    #[must_use]
    pub fn new(catalog: Arc<MovieCatalog>, renderer: Arc<MovieRenderer>) -> Self {
        let actions = ActionDispatcher::new(Arc::clone(&catalog), Arc::clone(&renderer));
        Self {
            catalog,
            renderer,
            actions,
        }
    }

    /// Handles a text message.
    ///
    /// With `is_explicit_command` the text is parsed as a slash command.
    /// Otherwise intent extraction decides, and text without a recognized
    /// intent is searched as a title.
    pub async fn handle_command_or_text(
        &self,
        text: &str,
        is_explicit_command: bool,
    ) -> DisplayPayload {
        if is_explicit_command {
            if let Some(command) = parse_command(text) {
                return self.handle_command(command, None).await;
            }
        }

        let intent = intent::extract(text);
        debug!(?intent, "Intent extracted");
        match intent {
            Intent::Search { query } => self.search(&query).await,
            Intent::Recommend { genre } => self.recommend(genre.as_deref()).await,
            Intent::None => self.search(text).await,
        }
    }

    /// Handles a parsed slash command.
    pub async fn handle_command(
        &self,
        command: ChatCommand,
        user_name: Option<&str>,
    ) -> DisplayPayload {
        match command {
            ChatCommand::Start => DisplayPayload::html(DefaultMovieView::welcome_message(
                user_name.unwrap_or(FALLBACK_USER_NAME),
            )),
            ChatCommand::Help => DisplayPayload::html(DefaultMovieView::help_message()),
            ChatCommand::Search(query) => self.search(&query).await,
            ChatCommand::Recommend(genre) => self.recommend(non_blank(&genre)).await,
            ChatCommand::Popular => {
                let movies = self.catalog.get_popular(LIST_LIMIT).await;
                self.renderer
                    .render_list(&movies, DefaultMovieView::popular_intro())
            }
            ChatCommand::TopRated => {
                let movies = self.catalog.get_top_rated(LIST_LIMIT).await;
                self.renderer
                    .render_list(&movies, DefaultMovieView::top_rated_intro())
            }
            ChatCommand::Genre(name) => match non_blank(&name) {
                Some(name) => self.recommend(Some(name)).await,
                None => self.genre_list().await,
            },
            ChatCommand::Unknown(name) => {
                debug!(command = %name, "Unknown command");
                DisplayPayload::html(DefaultMovieView::unknown_command())
            }
        }
    }

    /// Handles a clicked button's callback data.
    pub async fn handle_action_token(&self, data: &str) -> DisplayPayload {
        match data.parse::<ActionToken>() {
            Ok(token) => self.actions.dispatch(token).await,
            Err(e) => {
                warn!(data = %data, error = %e, "Rejected action token");
                DisplayPayload::html(DefaultMovieView::invalid_action())
            }
        }
    }

    async fn search(&self, query: &str) -> DisplayPayload {
        let movies = match self.catalog.search_by_title(query, LIST_LIMIT).await {
            Ok(movies) => movies,
            Err(CatalogError::EmptyQuery) => {
                return DisplayPayload::html(DefaultMovieView::search_prompt());
            }
            Err(CatalogError::ProviderUnavailable(_)) => {
                return DisplayPayload::html(DefaultMovieView::provider_unavailable());
            }
        };

        let query = query.trim();
        info!(query = %query, results = movies.len(), "Title search");
        match movies.as_slice() {
            [] => DisplayPayload::html(DefaultMovieView::title_not_found(query)),
            [movie] => self.single_result(movie.clone()).await,
            _ => self
                .renderer
                .render_list(&movies, &DefaultMovieView::search_results_intro(query)),
        }
    }

    /// Detail view for a lone search hit, enriched when possible.
    async fn single_result(&self, movie: MovieSummary) -> DisplayPayload {
        if movie.id > 0 {
            match self.catalog.get_details(movie.id).await {
                Ok(Some(detail)) => return self.renderer.render_detail(&detail, None),
                Ok(None) => debug!(movie_id = movie.id, "Details missing, using summary"),
                Err(e) => warn!(movie_id = movie.id, error = %e, "Enrichment failed, using summary"),
            }
        }
        let genres = self.catalog.get_genres().await;
        let detail = MovieDetail::from_summary(movie, &genres);
        self.renderer.render_detail(&detail, None)
    }

    async fn recommend(&self, genre: Option<&str>) -> DisplayPayload {
        match genre {
            Some(genre) => {
                let movies = self.catalog.discover_by_genre(genre, LIST_LIMIT).await;
                if movies.is_empty() {
                    return DisplayPayload::html(DefaultMovieView::genre_without_results(genre));
                }
                self.renderer
                    .render_list(&movies, &DefaultMovieView::recommendation_intro(Some(genre)))
            }
            None => {
                let movies = self.catalog.get_popular(LIST_LIMIT).await;
                if movies.is_empty() {
                    return DisplayPayload::html(DefaultMovieView::no_recommendations());
                }
                self.renderer
                    .render_list(&movies, &DefaultMovieView::recommendation_intro(None))
            }
        }
    }

    async fn genre_list(&self) -> DisplayPayload {
        let genres = self.catalog.get_genres().await;
        if genres.is_empty() {
            return DisplayPayload::html(DefaultMovieView::genre_list_unavailable());
        }
        let names: Vec<&str> = genres.values().map(String::as_str).collect();
        DisplayPayload::html(DefaultMovieView::genre_list(&names))
    }
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}
