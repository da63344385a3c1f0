use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod username;

pub use username::{Username, ValidationError};

/// Display name of one movie as published by the source site.
///
/// The unit of identity for overlap comparison: exact string equality,
/// no normalization of case, whitespace, or release year.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Title(pub String);

impl Title {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Title {
    fn from(name: &str) -> Self {
        Title(name.to_string())
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a scrape run ended.
///
/// A scrape never fails outright; a fetch error or the page cap trims the
/// result instead. `Truncated` lets callers tell an empty-because-broken
/// watchlist apart from a genuinely empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// Every page of the watchlist was seen
    Complete,
    /// A fetch failed or the page cap was hit; titles may be missing
    Truncated,
}

/// One user's watchlist at scrape time. Ephemeral: built fresh per request,
/// never cached or persisted.
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistReport {
    pub username: Username,
    /// Deduplicated titles, sorted lexicographically
    pub titles: BTreeSet<Title>,
    pub status: ScrapeStatus,
    pub scraped_at: DateTime<Utc>,
}

impl WatchlistReport {
    pub fn is_complete(&self) -> bool {
        self.status == ScrapeStatus::Complete
    }
}

/// Result of intersecting 2-4 watchlists
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub usernames: Vec<Username>,
    /// Titles common to every watchlist, in ascending lexicographic order
    pub common: Vec<Title>,
    /// Users whose scrape truncated; their lists may be incomplete
    pub incomplete: Vec<Username>,
}

/// A single uniform random pick from the common titles
#[derive(Debug, Clone, Serialize)]
pub struct RandomPickReport {
    pub usernames: Vec<Username>,
    /// `None` when the watchlists share no titles
    pub pick: Option<Title>,
    pub incomplete: Vec<Username>,
}
