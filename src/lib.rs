//! CineBot: a Telegram bot for looking up movies on TMDB.

/// Follow-up button tokens and their dispatcher
pub mod actions;
/// Telegram transport: commands, handlers, delivery
pub mod bot;
/// Settings and rendering limits
pub mod config;
/// Per-event orchestration
pub mod conversation;
/// Free-text intent extraction
pub mod intent;
/// Display payloads and user-facing copy
pub mod render;
/// TMDB client, models, and catalog policy
pub mod tmdb;
/// Text helpers
pub mod utils;
