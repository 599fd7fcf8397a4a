//! Utility functions for text processing and Telegram HTML handling.
//!
//! Patterns are declared with the `lazy-regex` crate so they are validated at
//! compile time and built on first use.

// lazy_regex! uses once_cell internally
#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;

/// Match any HTML tag, opening or closing, with attributes
static RE_HTML_TAG: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"</?[a-zA-Z][^>]*>");

/// Safely truncates a string to a maximum character length (not bytes).
///
/// This is UTF-8 safe and will not panic on multi-byte characters.
///
/// # Examples
///
/// ```
/// use cinebot::utils::truncate_str;
/// let s = "Halo, dunia!";
/// assert_eq!(truncate_str(s, 4), "Halo");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Truncates to `max_chars` characters and appends `...` if anything was cut.
///
/// A string of exactly `max_chars` characters is returned untouched.
///
/// # Examples
///
/// ```
/// use cinebot::utils::truncate_with_ellipsis;
/// assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
/// assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
/// ```
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    format!("{}...", truncate_str(s, max_chars))
}

/// Escapes provider-supplied text for Telegram's HTML parse mode.
///
/// # Examples
///
/// ```
/// use cinebot::utils::escape_html;
/// assert_eq!(escape_html("Tom & Jerry <3"), "Tom &amp; Jerry &lt;3");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Removes all markup from Telegram HTML, leaving the text a user would see.
///
/// Tags are dropped and entities are decoded, so the result is safe to send
/// without a parse mode.
///
/// # Examples
///
/// ```
/// use cinebot::utils::strip_html;
/// assert_eq!(strip_html("<b>Up</b> &amp; <i>Away</i>"), "Up & Away");
/// ```
#[must_use]
pub fn strip_html(text: &str) -> String {
    let without_tags = RE_HTML_TAG.replace_all(text, "");
    html_escape::decode_html_entities(&without_tags).into_owned()
}

/// Number of characters Telegram will count for a message body.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
