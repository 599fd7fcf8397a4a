use super::{ActionKind, ActionToken};
use crate::config::{CAST_LIMIT, LIST_LIMIT};
use crate::render::view::{DefaultMovieView, MovieView};
use crate::render::{DisplayPayload, MovieRenderer};
use crate::tmdb::{CatalogError, MovieCatalog, MovieDetail};
use std::sync::Arc;
use tracing::debug;

/// Resolves clicked action tokens into payloads.
///
/// Holds no per-user state: the token carries everything a click needs.
pub struct ActionDispatcher {
    catalog: Arc<MovieCatalog>,
    renderer: Arc<MovieRenderer>,
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(catalog: Arc<MovieCatalog>, renderer: Arc<MovieRenderer>) -> Self {
        Self { catalog, renderer }
    }

    /// Runs one action. Provider outages and missing movies produce
    /// different messages.
    pub async fn dispatch(&self, token: ActionToken) -> DisplayPayload {
        debug!(kind = token.kind.as_str(), movie_id = token.movie_id, "Dispatching action");
        match token.kind {
            ActionKind::Select => self.select(token.movie_id).await,
            ActionKind::Trailer => self.trailer(token.movie_id).await,
            ActionKind::Cast => self.cast(token.movie_id).await,
            ActionKind::Similar => self.similar(token.movie_id).await,
        }
    }

    async fn select(&self, movie_id: u64) -> DisplayPayload {
        self.with_details(movie_id, |detail| {
            self.renderer
                .render_detail(detail, Some(DefaultMovieView::selected_intro()))
        })
        .await
    }

    async fn trailer(&self, movie_id: u64) -> DisplayPayload {
        self.with_details(movie_id, |detail| {
            let text = match detail.trailer() {
                Some(video) => {
                    DefaultMovieView::trailer_message(&detail.summary.title, &video.watch_url())
                }
                None => DefaultMovieView::no_trailer(&detail.summary.title),
            };
            DisplayPayload::html(text)
        })
        .await
    }

    async fn cast(&self, movie_id: u64) -> DisplayPayload {
        self.with_details(movie_id, |detail| {
            let lines: Vec<String> = detail
                .cast
                .iter()
                .take(CAST_LIMIT)
                .map(|member| DefaultMovieView::cast_line(&member.name, &member.character))
                .collect();
            let text = if lines.is_empty() {
                DefaultMovieView::no_cast(&detail.summary.title)
            } else {
                DefaultMovieView::cast_message(&detail.summary.title, &lines)
            };
            DisplayPayload::html(text)
        })
        .await
    }

    async fn similar(&self, movie_id: u64) -> DisplayPayload {
        match self.catalog.try_similar(movie_id, LIST_LIMIT).await {
            Ok(movies) if movies.is_empty() => DisplayPayload::html(DefaultMovieView::no_similar()),
            Ok(movies) => self
                .renderer
                .render_list(&movies, DefaultMovieView::similar_intro()),
            Err(_) => DisplayPayload::html(DefaultMovieView::provider_unavailable()),
        }
    }

    /// Fetches details and renders them with `render`, or reports why not.
    async fn with_details<F>(&self, movie_id: u64, render: F) -> DisplayPayload
    where
        F: FnOnce(&MovieDetail) -> DisplayPayload,
    {
        match self.catalog.get_details(movie_id).await {
            Ok(Some(detail)) => render(&detail),
            Ok(None) => DisplayPayload::html(DefaultMovieView::movie_not_found()),
            Err(CatalogError::ProviderUnavailable(_) | CatalogError::EmptyQuery) => {
                DisplayPayload::html(DefaultMovieView::provider_unavailable())
            }
        }
    }
}
