//! Movie catalog: the bot-facing provider client.
//!
//! Search and detail lookups are primary user actions; their transport
//! failures surface as [`CatalogError::ProviderUnavailable`]. Similar,
//! popular, top-rated, and discovery lists are suggestions; they log failures
//! and return an empty list.

use super::{ApiError, GenreCache, GenreMap, MovieApi, MovieDetail, MovieSummary};
use crate::config::Settings;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Failures of primary catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The user gave no search text
    #[error("search query is empty")]
    EmptyQuery,
    /// TMDB could not be reached or answered with an error
    #[error("movie provider unavailable: {0}")]
    ProviderUnavailable(#[source] ApiError),
}

/// Policy layer over a [`MovieApi`].
pub struct MovieCatalog {
    api: Arc<dyn MovieApi>,
    genres: Arc<GenreCache>,
    details: Option<Cache<u64, Arc<MovieDetail>>>,
}

impl MovieCatalog {
    /// Creates a catalog without a detail cache.
    #[must_use]
    pub fn new(api: Arc<dyn MovieApi>, genres: Arc<GenreCache>) -> Self {
        Self {
            api,
            genres,
            details: None,
        }
    }

    /// Creates a catalog configured from settings.
    #[must_use]
    pub fn from_settings(
        api: Arc<dyn MovieApi>,
        genres: Arc<GenreCache>,
        settings: &Settings,
    ) -> Self {
        let catalog = Self::new(api, genres);
        if settings.detail_cache_ttl_secs == 0 {
            return catalog;
        }
        catalog.with_detail_cache(
            Duration::from_secs(settings.detail_cache_ttl_secs),
            settings.detail_cache_max_size,
        )
    }

    /// Keeps successful detail lookups for `ttl`.
    #[must_use]
    pub fn with_detail_cache(mut self, ttl: Duration, max_capacity: u64) -> Self {
        self.details = Some(
            Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    /// Searches by title and returns at most `limit` results in provider order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyQuery` for a blank query and
    /// `CatalogError::ProviderUnavailable` if TMDB fails.
    pub async fn search_by_title(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let mut results = self.api.search_movies(query).await.map_err(|e| {
            tracing::error!(query = %query, error = %e, "TMDB search failed");
            CatalogError::ProviderUnavailable(e)
        })?;
        results.truncate(limit);
        debug!(query = %query, count = results.len(), "TMDB search finished");
        Ok(results)
    }

    /// Fetches details with videos and credits attached.
    ///
    /// Returns `Ok(None)` when TMDB reports the movie does not exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProviderUnavailable` on any other failure.
    pub async fn get_details(
        &self,
        movie_id: u64,
    ) -> Result<Option<Arc<MovieDetail>>, CatalogError> {
        if let Some(cached) = self.cached_detail(movie_id).await {
            debug!(movie_id, "Movie details served from cache");
            return Ok(Some(cached));
        }

        match self.api.movie_details(movie_id).await {
            Ok(detail) => {
                let detail = Arc::new(detail);
                if let Some(cache) = &self.details {
                    cache.insert(movie_id, Arc::clone(&detail)).await;
                }
                Ok(Some(detail))
            }
            Err(ApiError::NotFound) => {
                debug!(movie_id, "Movie not found on TMDB");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(movie_id, error = %e, "TMDB details lookup failed");
                Err(CatalogError::ProviderUnavailable(e))
            }
        }
    }

    async fn cached_detail(&self, movie_id: u64) -> Option<Arc<MovieDetail>> {
        match &self.details {
            Some(cache) => cache.get(&movie_id).await,
            None => None,
        }
    }

    /// Movies similar to `movie_id`; empty on failure.
    pub async fn get_similar(&self, movie_id: u64, limit: usize) -> Vec<MovieSummary> {
        suggestions("similar", limit, self.api.similar_movies(movie_id).await)
    }

    /// Movies similar to `movie_id`, for callers that must tell an outage
    /// apart from an empty answer.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProviderUnavailable` if TMDB fails.
    pub async fn try_similar(
        &self,
        movie_id: u64,
        limit: usize,
    ) -> Result<Vec<MovieSummary>, CatalogError> {
        let mut movies = self.api.similar_movies(movie_id).await.map_err(|e| {
            warn!(movie_id, error = %e, "TMDB similar lookup failed");
            CatalogError::ProviderUnavailable(e)
        })?;
        movies.truncate(limit);
        Ok(movies)
    }

    /// Currently popular movies; empty on failure.
    pub async fn get_popular(&self, limit: usize) -> Vec<MovieSummary> {
        suggestions("popular", limit, self.api.popular_movies().await)
    }

    /// Top-rated movies; empty on failure.
    pub async fn get_top_rated(&self, limit: usize) -> Vec<MovieSummary> {
        suggestions("top_rated", limit, self.api.top_rated_movies().await)
    }

    /// Genre table, fetched once and memoized.
    ///
    /// A failed or empty fetch returns an empty table and is not memoized, so
    /// the next call retries.
    pub async fn get_genres(&self) -> Arc<GenreMap> {
        if let Some(cached) = self.genres.get().await {
            return cached;
        }

        match self.api.genre_list().await {
            Ok(list) => {
                let genres: GenreMap = list.into_iter().map(|g| (g.id, g.name)).collect();
                debug!(count = genres.len(), "Genre list loaded");
                self.genres.store(genres).await
            }
            Err(e) => {
                warn!(error = %e, "Failed to load genre list");
                Arc::new(GenreMap::new())
            }
        }
    }

    /// Popular movies of the genre named `genre_name` (case-insensitive exact match).
    ///
    /// An unknown genre yields an empty list.
    pub async fn discover_by_genre(&self, genre_name: &str, limit: usize) -> Vec<MovieSummary> {
        let genres = self.get_genres().await;
        let Some(genre_id) = resolve_genre(&genres, genre_name) else {
            warn!(genre = %genre_name, "Genre unresolved");
            return Vec::new();
        };
        suggestions("discover", limit, self.api.discover_by_genre(genre_id).await)
    }
}

/// Case-insensitive exact lookup of a genre id by name.
#[must_use]
pub fn resolve_genre(genres: &GenreMap, name: &str) -> Option<u32> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    genres
        .iter()
        .find(|(_, genre)| genre.to_lowercase() == wanted)
        .map(|(id, _)| *id)
}

fn suggestions(
    source: &str,
    limit: usize,
    result: Result<Vec<MovieSummary>, ApiError>,
) -> Vec<MovieSummary> {
    match result {
        Ok(mut movies) => {
            movies.truncate(limit);
            movies
        }
        Err(e) => {
            warn!(source, error = %e, "Suggestion source failed, returning no results");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{Genre, MockMovieApi};
    use mockall::predicate::eq;

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            ..MovieSummary::default()
        }
    }

    fn catalog(api: MockMovieApi) -> MovieCatalog {
        MovieCatalog::new(Arc::new(api), Arc::new(GenreCache::new()))
    }

    #[tokio::test]
    async fn test_search_blank_query_is_rejected_without_network() {
        let mut api = MockMovieApi::new();
        api.expect_search_movies().never();

        let result = catalog(api).search_by_title("   ", 5).await;
        assert!(matches!(result, Err(CatalogError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_search_truncates_and_keeps_duplicates() -> Result<(), CatalogError> {
        let mut api = MockMovieApi::new();
        api.expect_search_movies()
            .with(eq("Inception"))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    movie(1, "A"),
                    movie(1, "A"),
                    movie(2, "B"),
                    movie(3, "C"),
                ])
            });

        let results = catalog(api).search_by_title(" Inception ", 3).await?;
        let ids: Vec<u64> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 1, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_network_failure_is_unavailable() {
        let mut api = MockMovieApi::new();
        api.expect_search_movies()
            .returning(|_| Err(ApiError::Network("connection reset".to_string())));

        let result = catalog(api).search_by_title("Inception", 5).await;
        assert!(matches!(result, Err(CatalogError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn test_details_not_found_is_absent() -> Result<(), CatalogError> {
        let mut api = MockMovieApi::new();
        api.expect_movie_details()
            .with(eq(404_u64))
            .returning(|_| Err(ApiError::NotFound));

        assert!(catalog(api).get_details(404).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_details_failure_is_unavailable() {
        let mut api = MockMovieApi::new();
        api.expect_movie_details().returning(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        });

        let result = catalog(api).get_details(1).await;
        assert!(matches!(result, Err(CatalogError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn test_detail_cache_serves_repeat_lookups() -> Result<(), CatalogError> {
        let mut api = MockMovieApi::new();
        api.expect_movie_details()
            .with(eq(7_u64))
            .times(1)
            .returning(|id| Ok(MovieDetail::from(movie(id, "Cached"))));

        let catalog = catalog(api).with_detail_cache(Duration::from_secs(60), 10);
        let first = catalog.get_details(7).await?;
        let second = catalog.get_details(7).await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_suggestions_swallow_errors() {
        let mut api = MockMovieApi::new();
        api.expect_similar_movies()
            .returning(|_| Err(ApiError::Network("timeout".to_string())));
        api.expect_popular_movies()
            .returning(|| Err(ApiError::Json("bad".to_string())));
        api.expect_top_rated_movies().returning(|| {
            Err(ApiError::Status {
                status: 503,
                message: String::new(),
            })
        });

        let catalog = catalog(api);
        assert!(catalog.get_similar(1, 5).await.is_empty());
        assert!(catalog.get_popular(5).await.is_empty());
        assert!(catalog.get_top_rated(5).await.is_empty());
    }

    #[tokio::test]
    async fn test_try_similar_reports_failure() {
        let mut api = MockMovieApi::new();
        api.expect_similar_movies()
            .with(eq(10_u64))
            .returning(|_| Err(ApiError::Network("timeout".to_string())));

        let result = catalog(api).try_similar(10, 5).await;
        assert!(matches!(result, Err(CatalogError::ProviderUnavailable(_))));
    }

    #[tokio::test]
    async fn test_popular_is_truncated_to_limit() {
        let mut api = MockMovieApi::new();
        api.expect_popular_movies()
            .returning(|| Ok((1..=20).map(|id| movie(id, "P")).collect()));

        assert_eq!(catalog(api).get_popular(5).await.len(), 5);
    }

    #[tokio::test]
    async fn test_genres_are_fetched_once() {
        let mut api = MockMovieApi::new();
        api.expect_genre_list().times(1).returning(|| {
            Ok(vec![Genre {
                id: 27,
                name: "Horror".to_string(),
            }])
        });

        let catalog = catalog(api);
        let first = catalog.get_genres().await;
        let second = catalog.get_genres().await;
        assert_eq!(first.get(&27).map(String::as_str), Some("Horror"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_genre_fetch_is_retried() {
        let mut api = MockMovieApi::new();
        let mut seq = mockall::Sequence::new();
        api.expect_genre_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ApiError::Network("down".to_string())));
        api.expect_genre_list()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| {
                Ok(vec![Genre {
                    id: 35,
                    name: "Comedy".to_string(),
                }])
            });

        let catalog = catalog(api);
        assert!(catalog.get_genres().await.is_empty());
        assert_eq!(catalog.get_genres().await.len(), 1);
    }

    #[tokio::test]
    async fn test_discover_resolves_genre_case_insensitively() {
        let mut api = MockMovieApi::new();
        api.expect_genre_list().times(1).returning(|| {
            Ok(vec![Genre {
                id: 27,
                name: "Horror".to_string(),
            }])
        });
        api.expect_discover_by_genre()
            .with(eq(27_u32))
            .times(2)
            .returning(|_| Ok(vec![movie(1, "Scream"), movie(2, "It")]));

        let catalog = catalog(api);
        assert_eq!(catalog.discover_by_genre("Horror", 5).await.len(), 2);
        assert_eq!(catalog.discover_by_genre("hORROR", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn test_discover_unknown_genre_is_empty() {
        let mut api = MockMovieApi::new();
        api.expect_genre_list().returning(|| {
            Ok(vec![Genre {
                id: 27,
                name: "Horror".to_string(),
            }])
        });
        api.expect_discover_by_genre().never();

        assert!(catalog(api)
            .discover_by_genre("Nonexistent", 5)
            .await
            .is_empty());
    }

    #[test]
    fn test_resolve_genre_is_exact() {
        let genres = GenreMap::from([
            (878, "Science Fiction".to_string()),
            (27, "Horror".to_string()),
        ]);
        assert_eq!(resolve_genre(&genres, "science fiction"), Some(878));
        assert_eq!(resolve_genre(&genres, "science"), None);
        assert_eq!(resolve_genre(&genres, ""), None);
    }
}
