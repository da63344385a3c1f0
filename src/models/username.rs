use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root domain of the film-tracking site
const SITE_DOMAIN: &str = "letterboxd.com";

/// Path segment that marks a watchlist page
const WATCHLIST_SEGMENT: &str = "watchlist";

/// Why a username-or-URL input was rejected
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username or URL cannot be empty")]
    EmptyInput,

    #[error("invalid URL format")]
    MalformedUrl,

    #[error("URL must be from {SITE_DOMAIN}")]
    WrongDomain,

    #[error("URL must be a watchlist page")]
    NotAWatchlistPath,

    #[error("username not found in URL")]
    MissingUsername,
}

/// Canonical Letterboxd username.
///
/// Never empty and never carries a leading `@`. Obtained only through
/// [`Username::parse`], which accepts either a bare username or a full
/// watchlist URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parse a user-supplied identifier into a canonical username.
    ///
    /// A leading `@` is stripped first (chat clients tend to add one).
    /// Input without any `/` is taken as a bare username; anything else
    /// must be a full watchlist URL on the expected domain, from which
    /// the username is the first path segment.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let stripped = trimmed.strip_prefix('@').unwrap_or(trimmed);

        if stripped.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        if !stripped.contains('/') {
            return Ok(Username(stripped.to_string()));
        }

        let parsed = Url::parse(stripped).map_err(|_| ValidationError::MalformedUrl)?;
        let host = parsed.host_str().ok_or(ValidationError::MalformedUrl)?;

        // Exact host or a true subdomain; a plain suffix match would let
        // "notletterboxd.com" through.
        if host != SITE_DOMAIN && !host.ends_with(&format!(".{SITE_DOMAIN}")) {
            return Err(ValidationError::WrongDomain);
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        if !segments.iter().any(|seg| *seg == WATCHLIST_SEGMENT) {
            return Err(ValidationError::NotAWatchlistPath);
        }

        match segments.first() {
            Some(first) if *first != WATCHLIST_SEGMENT => Ok(Username(first.to_string())),
            _ => Err(ValidationError::MissingUsername),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
