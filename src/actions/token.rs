//! Callback tokens carried by inline buttons.
//!
//! A token is `"{kind}:{movie_id}"`, well under Telegram's 64-byte
//! `callback_data` limit. It is the only state a follow-up click needs.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Follow-up action offered on a rendered movie or list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Open the detail view of a listed movie
    Select,
    /// Link the movie's trailer
    Trailer,
    /// Show the billed cast
    Cast,
    /// List similar movies
    Similar,
}

impl ActionKind {
    /// All kinds, in button order
    pub const ALL: [Self; 4] = [Self::Select, Self::Trailer, Self::Cast, Self::Similar];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Trailer => "trailer",
            Self::Cast => "cast",
            Self::Similar => "similar",
        }
    }
}

/// Errors when decoding a callback token
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// No `kind:id` separator
    #[error("malformed action token: {0}")]
    Malformed(String),
    /// The kind is not one we issue
    #[error("unknown action kind: {0}")]
    UnknownKind(String),
    /// The id is not a positive integer
    #[error("invalid movie id in action token: {0}")]
    InvalidId(String),
}

/// Decoded `(kind, movie id)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionToken {
    pub kind: ActionKind,
    pub movie_id: u64,
}

impl ActionToken {
    #[must_use]
    pub const fn new(kind: ActionKind, movie_id: u64) -> Self {
        Self { kind, movie_id }
    }

    /// Callback data for this token
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.movie_id)
    }
}

impl FromStr for ActionKind {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TokenError::UnknownKind(s.to_string()))
    }
}

impl FromStr for ActionToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| TokenError::Malformed(s.to_string()))?;
        let kind = kind.parse()?;
        let movie_id = id
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| TokenError::InvalidId(id.to_string()))?;
        Ok(Self { kind, movie_id })
    }
}
