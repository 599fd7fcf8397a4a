//! Configuration and settings management
//!
//! Loads settings from config files and environment variables and defines
//! the rendering limits shared by the renderer and the Telegram transport.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_token: String,

    /// TMDB v3 API key, sent as the `api_key` query parameter
    pub tmdb_api_key: String,

    /// Base URL of the TMDB v3 REST API
    #[serde(default = "default_tmdb_api_base_url")]
    pub tmdb_api_base_url: String,

    /// Prefix used to turn a `poster_path` into a fetchable image URL
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Response locale passed to every TMDB request
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Locale of the genre list; user-typed genre names are matched against it
    #[serde(default = "default_tmdb_genre_language")]
    pub tmdb_genre_language: String,

    /// Timeout for a single TMDB HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// How long fetched movie details stay cached (0 disables the cache)
    #[serde(default = "default_detail_cache_ttl_secs")]
    pub detail_cache_ttl_secs: u64,

    /// Maximum number of cached movie details
    #[serde(default = "default_detail_cache_max_size")]
    pub detail_cache_max_size: u64,
}

fn default_tmdb_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "id-ID".to_string()
}

fn default_tmdb_genre_language() -> String {
    "en-US".to_string()
}

const fn default_http_timeout_secs() -> u64 {
    30
}

const fn default_detail_cache_ttl_secs() -> u64 {
    600
}

const fn default_detail_cache_max_size() -> u64 {
    1000
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cinebot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or a required token is blank.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Not checked into git
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            // Plain TELEGRAM_TOKEN / TMDB_API_KEY, usually from .env.
            // Empty env vars are treated as unset.
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the required credentials are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` naming the first blank credential.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "TELEGRAM_TOKEN is not set in the environment".to_string(),
            ));
        }
        if self.tmdb_api_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "TMDB_API_KEY is not set in the environment".to_string(),
            ));
        }
        Ok(())
    }
}

// Rendering limits
/// Maximum number of movies shown (and offered as buttons) in a list view
pub const LIST_LIMIT: usize = 5;
/// Maximum number of cast entries shown by the cast action
pub const CAST_LIMIT: usize = 7;
/// Overview characters kept before an ellipsis is appended
pub const OVERVIEW_LIMIT: usize = 300;
/// Tagline characters kept before an ellipsis is appended
pub const TAGLINE_LIMIT: usize = 150;
/// Maximum message length for Telegram with safety margin (official limit: 4096)
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;
/// Maximum photo caption length for Telegram with safety margin (official limit: 1024)
pub const TELEGRAM_CAPTION_LIMIT: usize = 1000;
