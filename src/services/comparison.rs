use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::{ComparisonReport, RandomPickReport, ScrapeStatus, Title, Username},
    services::watchlist::WatchlistScraper,
};

/// Product constraint carried over from the chat command's argument slots
pub const MIN_USERS: usize = 2;
pub const MAX_USERS: usize = 4;

/// Intersect 2-4 watchlists into the titles common to all of them.
///
/// The result is in ascending lexicographic order regardless of input
/// order or set internals, so output is reproducible.
pub fn intersect_watchlists(watchlists: &[&BTreeSet<Title>]) -> AppResult<Vec<Title>> {
    if !(MIN_USERS..=MAX_USERS).contains(&watchlists.len()) {
        return Err(AppError::InvalidUserCount(watchlists.len()));
    }

    let Some((first, rest)) = watchlists.split_first() else {
        return Err(AppError::InvalidUserCount(0));
    };

    // BTreeSet iteration is already sorted
    let common = first
        .iter()
        .filter(|title| rest.iter().all(|set| set.contains(*title)))
        .cloned()
        .collect();

    Ok(common)
}

/// Uniform random choice from the common titles; `None` when empty
pub fn pick_random<R: Rng + ?Sized>(rng: &mut R, titles: &[Title]) -> Option<Title> {
    titles.choose(rng).cloned()
}

/// The two operations exposed to the serving layer: list the watchlist
/// overlap for 2-4 users, or pick one random shared title.
pub struct ComparisonService {
    scraper: WatchlistScraper,
}

impl ComparisonService {
    pub fn new(scraper: WatchlistScraper) -> Self {
        Self { scraper }
    }

    /// Validate each username-or-URL, scrape every watchlist, and
    /// intersect them.
    ///
    /// Validation and count errors are caller-visible; scrape failures are
    /// not. A failed scrape degrades to a smaller (possibly empty) set and
    /// shows up in the report's `incomplete` list instead.
    pub async fn compare(&self, inputs: &[String]) -> AppResult<ComparisonReport> {
        if !(MIN_USERS..=MAX_USERS).contains(&inputs.len()) {
            return Err(AppError::InvalidUserCount(inputs.len()));
        }

        let usernames = inputs
            .iter()
            .map(|raw| Username::parse(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let reports = self.scraper.scrape_all(&usernames).await;

        let sets: Vec<&BTreeSet<Title>> = reports.iter().map(|r| &r.titles).collect();
        let common = intersect_watchlists(&sets)?;

        let incomplete: Vec<Username> = reports
            .iter()
            .filter(|r| r.status == ScrapeStatus::Truncated)
            .map(|r| r.username.clone())
            .collect();

        tracing::info!(
            users = usernames.len(),
            common = common.len(),
            incomplete = incomplete.len(),
            "Watchlist comparison completed"
        );

        Ok(ComparisonReport {
            usernames,
            common,
            incomplete,
        })
    }

    /// Same pipeline as [`compare`](Self::compare), then one uniform
    /// random pick from the overlap
    pub async fn random_common(&self, inputs: &[String]) -> AppResult<RandomPickReport> {
        let report = self.compare(inputs).await?;
        let pick = pick_random(&mut rand::thread_rng(), &report.common);

        Ok(RandomPickReport {
            usernames: report.usernames,
            pick,
            incomplete: report.incomplete,
        })
    }
}
