//! reqwest implementation of [`MovieApi`] against TMDB API v3.
//!
//! Docs: <https://developer.themoviedb.org/docs>

use super::models::{GenreList, ResultsPage};
use super::{ApiError, Genre, MovieApi, MovieDetail, MovieSummary};
use crate::config::Settings;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Longest error body kept in an [`ApiError::Status`] message
const MAX_ERROR_BODY: usize = 500;

/// TMDB v3 client authenticated with an API key query parameter.
pub struct TmdbClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
    language: String,
    genre_language: String,
}

impl TmdbClient {
    /// Creates a client from loaded settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self::with_base_url(
            settings.tmdb_api_key.clone(),
            settings.tmdb_api_base_url.clone(),
            settings.tmdb_language.clone(),
            Duration::from_secs(settings.http_timeout_secs),
        )
        .with_genre_language(settings.tmdb_genre_language.clone())
    }

    /// Creates a client against an explicit base URL.
    ///
    /// The genre list is requested in `language` too until
    /// [`with_genre_language`](Self::with_genre_language) says otherwise.
    #[must_use]
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        language: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: create_http_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            genre_language: language.clone(),
            language,
        }
    }

    /// Locale for the genre list, which users match by typing names
    #[must_use]
    pub fn with_genre_language(mut self, genre_language: String) -> Self {
        self.genre_language = genre_language;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.get_json_in(&self.language, path, params).await
    }

    async fn get_json_in<T: DeserializeOwned>(
        &self,
        language: &str,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut all_params = vec![("api_key", self.api_key.as_str()), ("language", language)];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(path = %path, language = %language, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            // without_url: reqwest embeds the full URL, api_key included
            .map_err(|e| ApiError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: summarize_error_body(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Json(e.without_url().to_string()))
    }

    async fn get_results(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, ApiError> {
        let page: ResultsPage<MovieSummary> = self.get_json(path, params).await?;
        Ok(page.results)
    }
}

/// Creates an HTTP client with the given timeout.
///
/// Falls back to reqwest defaults if the builder rejects the configuration.
fn create_http_client(timeout: Duration) -> HttpClient {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Keeps error bodies readable in logs: no HTML pages, no unbounded text.
fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim_start();
    let is_html = trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html")
        || trimmed.starts_with("<HTML");

    if is_html {
        "server returned HTML error page".to_string()
    } else if body.chars().count() > MAX_ERROR_BODY {
        format!(
            "{}... (truncated)",
            crate::utils::truncate_str(body, MAX_ERROR_BODY)
        )
    } else {
        body.to_string()
    }
}

#[async_trait::async_trait]
impl MovieApi for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        self.get_results("/search/movie", &[("query", query), ("page", "1")])
            .await
    }

    async fn movie_details(&self, movie_id: u64) -> Result<MovieDetail, ApiError> {
        self.get_json(
            &format!("/movie/{movie_id}"),
            &[("append_to_response", "videos,credits")],
        )
        .await
    }

    async fn similar_movies(&self, movie_id: u64) -> Result<Vec<MovieSummary>, ApiError> {
        self.get_results(&format!("/movie/{movie_id}/similar"), &[("page", "1")])
            .await
    }

    async fn popular_movies(&self) -> Result<Vec<MovieSummary>, ApiError> {
        self.get_results("/movie/popular", &[("page", "1")]).await
    }

    async fn top_rated_movies(&self) -> Result<Vec<MovieSummary>, ApiError> {
        self.get_results("/movie/top_rated", &[("page", "1")]).await
    }

    async fn genre_list(&self) -> Result<Vec<Genre>, ApiError> {
        let list: GenreList = self
            .get_json_in(&self.genre_language, "/genre/movie/list", &[])
            .await?;
        Ok(list.genres)
    }

    async fn discover_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>, ApiError> {
        let genre = genre_id.to_string();
        self.get_results(
            "/discover/movie",
            &[
                ("sort_by", "popularity.desc"),
                ("with_genres", genre.as_str()),
                ("page", "1"),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_error_body_hides_html() {
        let body = "<!DOCTYPE html><html><body>502 Bad Gateway</body></html>";
        assert_eq!(summarize_error_body(body), "server returned HTML error page");
    }

    #[test]
    fn test_summarize_error_body_truncates_long_text() {
        let body = "x".repeat(2000);
        let summary = summarize_error_body(&body);
        assert!(summary.ends_with("... (truncated)"));
        assert!(summary.len() < 600);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TmdbClient::with_base_url(
            "key".to_string(),
            "https://api.themoviedb.org/3/".to_string(),
            "id-ID".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(client.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_genre_list_locale_follows_settings() {
        let settings = Settings {
            telegram_token: "token".to_string(),
            tmdb_api_key: "key".to_string(),
            tmdb_api_base_url: "https://api.themoviedb.org/3".to_string(),
            tmdb_image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            tmdb_language: "id-ID".to_string(),
            tmdb_genre_language: "en-US".to_string(),
            http_timeout_secs: 5,
            detail_cache_ttl_secs: 0,
            detail_cache_max_size: 10,
        };
        let client = TmdbClient::new(&settings);
        assert_eq!(client.language, "id-ID");
        assert_eq!(client.genre_language, "en-US");

        let plain = TmdbClient::with_base_url(
            "key".to_string(),
            "https://api.themoviedb.org/3".to_string(),
            "id-ID".to_string(),
            Duration::from_secs(5),
        );
        assert_eq!(plain.genre_language, "id-ID");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = TmdbClient::with_base_url(
            "secret-key".to_string(),
            "http://127.0.0.1:9".to_string(),
            "id-ID".to_string(),
            Duration::from_secs(2),
        );
        match client.popular_movies().await {
            Err(ApiError::Network(message)) => assert!(!message.contains("secret-key")),
            other => panic!("expected network error, got {other:?}"),
        }
    }
}
