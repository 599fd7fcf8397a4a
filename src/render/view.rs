//! User-facing copy
//!
//! Every string the bot shows lives here. Returned text is Telegram HTML;
//! arguments are escaped by the implementation.

use crate::utils::escape_html;

// ─────────────────────────────────────────────────────────────────────────────
// Trait definition
// ─────────────────────────────────────────────────────────────────────────────

/// Texts and labels for movie conversations
pub trait MovieView {
    /// Reply to `/start`
    fn welcome_message(user_name: &str) -> String;

    /// Reply to `/help`
    fn help_message() -> &'static str;

    /// Search command or intent without a title
    fn search_prompt() -> &'static str;

    /// TMDB unreachable during a primary action
    fn provider_unavailable() -> &'static str;

    /// Last-resort apology when a turn fails unexpectedly
    fn generic_error() -> &'static str;

    /// No search results for `query`
    fn title_not_found(query: &str) -> String;

    /// Intro line above a list of search results
    fn search_results_intro(query: &str) -> String;

    /// Details lookup found nothing
    fn movie_not_found() -> &'static str;

    /// Intro line above a selected movie
    fn selected_intro() -> &'static str;

    /// Trailer link message
    fn trailer_message(title: &str, url: &str) -> String;

    /// Movie has no YouTube trailer or teaser
    fn no_trailer(title: &str) -> String;

    /// Cast message from already formatted `name as character` lines
    fn cast_message(title: &str, lines: &[String]) -> String;

    /// One cast line
    fn cast_line(name: &str, character: &str) -> String;

    /// Movie has no cast entries
    fn no_cast(title: &str) -> String;

    /// Intro line above similar movies
    fn similar_intro() -> &'static str;

    /// No similar movies
    fn no_similar() -> &'static str;

    /// A list renderer was given nothing
    fn nothing_found() -> &'static str;

    /// Intro line above recommendations
    fn recommendation_intro(genre: Option<&str>) -> String;

    /// No movies for the requested genre
    fn genre_without_results(genre: &str) -> String;

    /// Popular list came back empty
    fn no_recommendations() -> &'static str;

    /// Intro line above popular movies
    fn popular_intro() -> &'static str;

    /// Intro line above top-rated movies
    fn top_rated_intro() -> &'static str;

    /// Available genre names
    fn genre_list(names: &[&str]) -> String;

    /// Genre list could not be loaded
    fn genre_list_unavailable() -> &'static str;

    /// Button token could not be decoded
    fn invalid_action() -> &'static str;

    /// Slash command we do not know
    fn unknown_command() -> &'static str;

    /// Button labels for the detail view
    fn trailer_button() -> &'static str;
    fn cast_button() -> &'static str;
    fn similar_button() -> &'static str;
}

// ─────────────────────────────────────────────────────────────────────────────
// Default implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Default Indonesian implementation of `MovieView`
pub struct DefaultMovieView;

impl MovieView for DefaultMovieView {
    fn welcome_message(user_name: &str) -> String {
        format!(
            "Hai {}! Selamat datang di CineBot 🎬\n\n\
             Cari film dengan /carijudul <i>judul</i>, atau langsung ketik misalnya \
             <i>cariin film Inception</i> atau <i>rekomendasiin film genre horror</i>.\n\n\
             Ketik /help untuk daftar perintah.",
            escape_html(user_name)
        )
    }

    fn help_message() -> &'static str {
        "🎬 <b>Perintah CineBot</b>\n\n\
         /carijudul <i>judul</i> - cari film berdasarkan judul\n\
         /rekomendasi <i>[genre]</i> - rekomendasi film\n\
         /populer - film yang sedang populer\n\
         /toprated - film dengan rating tertinggi\n\
         /genre <i>[nama]</i> - daftar genre atau film per genre\n\n\
         Kamu juga bisa mengetik bebas, misalnya <i>cariin film Inception</i>."
    }

    fn search_prompt() -> &'static str {
        "Judul filmnya apa nih bro/sis? 🤔 Kasih tau dong!\nContoh: <code>/carijudul Inception</code>"
    }

    fn provider_unavailable() -> &'static str {
        "Terjadi gangguan ke koneksi database film. Coba lagi nanti 🙏"
    }

    fn generic_error() -> &'static str {
        "Ada error pada sistem. Coba lagi nanti 🙏"
    }

    fn title_not_found(query: &str) -> String {
        format!(
            "Film '{}' tidak ditemukan. Periksa ulang judulnya atau cari film lain",
            escape_html(query)
        )
    }

    fn search_results_intro(query: &str) -> String {
        format!(
            "🔎 Hasil pencarian untuk '{}'. Pilih salah satu:",
            escape_html(query)
        )
    }

    fn movie_not_found() -> &'static str {
        "😕 Film tidak ditemukan."
    }

    fn selected_intro() -> &'static str {
        "Kamu memilih:"
    }

    fn trailer_message(title: &str, url: &str) -> String {
        format!(
            "🎞️ Trailer <b>{}</b>:\n{}",
            escape_html(title),
            escape_html(url)
        )
    }

    fn no_trailer(title: &str) -> String {
        format!("😕 Trailer untuk <b>{}</b> tidak tersedia.", escape_html(title))
    }

    fn cast_message(title: &str, lines: &[String]) -> String {
        format!(
            "👥 <b>Pemeran {}</b>\n\n{}",
            escape_html(title),
            lines.join("\n")
        )
    }

    fn cast_line(name: &str, character: &str) -> String {
        if character.trim().is_empty() {
            format!("• {}", escape_html(name))
        } else {
            format!(
                "• {} sebagai <i>{}</i>",
                escape_html(name),
                escape_html(character)
            )
        }
    }

    fn no_cast(title: &str) -> String {
        format!(
            "😕 Data pemeran untuk <b>{}</b> tidak tersedia.",
            escape_html(title)
        )
    }

    fn similar_intro() -> &'static str {
        "🎬 Film yang mirip:"
    }

    fn no_similar() -> &'static str {
        "😕 Tidak ada film serupa yang ditemukan."
    }

    fn nothing_found() -> &'static str {
        "😕 Tidak ada film yang ditemukan."
    }

    fn recommendation_intro(genre: Option<&str>) -> String {
        match genre {
            Some(genre) => format!("🍿 Rekomendasi film genre {}:", escape_html(genre)),
            None => "🍿 Rekomendasi film populer buat kamu:".to_string(),
        }
    }

    fn genre_without_results(genre: &str) -> String {
        format!(
            "😕 Tidak ada rekomendasi untuk genre '{}'. Ketik /genre untuk melihat daftar genre.",
            escape_html(genre)
        )
    }

    fn no_recommendations() -> &'static str {
        "😕 Belum ada rekomendasi saat ini. Coba lagi nanti."
    }

    fn popular_intro() -> &'static str {
        "🔥 Film yang sedang populer:"
    }

    fn top_rated_intro() -> &'static str {
        "🏆 Film dengan rating tertinggi:"
    }

    fn genre_list(names: &[&str]) -> String {
        let names: Vec<String> = names.iter().map(|n| escape_html(n)).collect();
        format!(
            "🎭 <b>Genre yang tersedia</b>\n\n{}\n\nContoh: <code>/genre {}</code>",
            names.join(", "),
            names.first().map_or("Horror", String::as_str)
        )
    }

    fn genre_list_unavailable() -> &'static str {
        "😕 Daftar genre belum bisa dimuat. Coba lagi nanti."
    }

    fn invalid_action() -> &'static str {
        "⚠️ Tombol ini sudah tidak berlaku. Silakan cari ulang filmnya."
    }

    fn unknown_command() -> &'static str {
        "Perintah tidak dikenal. Ketik /help untuk daftar perintah."
    }

    fn trailer_button() -> &'static str {
        "🎞️ Trailer"
    }

    fn cast_button() -> &'static str {
        "👥 Pemeran"
    }

    fn similar_button() -> &'static str {
        "🎬 Film Serupa"
    }
}
