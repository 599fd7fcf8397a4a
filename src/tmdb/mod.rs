//! TMDB provider boundary
//!
//! [`MovieApi`] is a thin, one-method-per-endpoint view of the TMDB v3 API.
//! [`MovieCatalog`] sits on top of it and owns the result policy: limits,
//! genre resolution, detail caching, and which failures reach the caller.

mod catalog;
mod client;
mod genres;
pub mod models;

pub use catalog::{CatalogError, MovieCatalog};
pub use client::TmdbClient;
pub use genres::GenreCache;
pub use models::{CastMember, Genre, GenreMap, MovieDetail, MovieSummary, Video};

use thiserror::Error;

/// Errors that can occur while talking to TMDB
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS, or timeout failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),
    /// TMDB answered with a non-success status
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Short description, never raw HTML
        message: String,
    },
    /// TMDB answered 404 for the requested resource
    #[error("Resource not found")]
    NotFound,
    /// The response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(String),
}

/// Raw access to the TMDB endpoints used by the bot.
///
/// List endpoints return page 1 in provider order. Implementations do not
/// truncate, deduplicate, or swallow errors; that is [`MovieCatalog`]'s job.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieApi: Send + Sync {
    /// `GET /search/movie?query=&page=1`
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError>;

    /// `GET /movie/{id}?append_to_response=videos,credits`
    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail, ApiError>;

    /// `GET /movie/{id}/similar?page=1`
    async fn similar_movies(&self, movie_id: u64) -> Result<Vec<MovieSummary>, ApiError>;

    /// `GET /movie/popular?page=1`
    async fn popular_movies(&self) -> Result<Vec<MovieSummary>, ApiError>;

    /// `GET /movie/top_rated?page=1`
    async fn top_rated_movies(&self) -> Result<Vec<MovieSummary>, ApiError>;

    /// `GET /genre/movie/list`
    async fn genre_list(&self) -> Result<Vec<Genre>, ApiError>;

    /// `GET /discover/movie?sort_by=popularity.desc&with_genres={id}`
    async fn discover_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>, ApiError>;
}
