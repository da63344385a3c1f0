use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{
    models::{ScrapeStatus, Title, Username, WatchlistReport},
    services::extract::extract_page,
    services::fetcher::{page_url, watchlist_url, PageFetcher},
};

/// Scrapes complete, paginated watchlists from the source site.
///
/// Fail-soft by contract: a scrape never errors. A fetch failure or the
/// page cap trims the result and marks it [`ScrapeStatus::Truncated`]
/// instead of aborting the comparison it feeds.
#[derive(Clone)]
pub struct WatchlistScraper {
    fetcher: Arc<dyn PageFetcher>,
    base_url: String,
    page_delay: Duration,
    max_pages: u32,
}

impl WatchlistScraper {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        base_url: impl Into<String>,
        page_delay: Duration,
        max_pages: u32,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            page_delay,
            max_pages: max_pages.max(1),
        }
    }

    /// Scrape one user's watchlist, page by page.
    ///
    /// Pages are fetched strictly in order, with the configured delay
    /// between requests as a courtesy to the source site. Pagination ends
    /// on an empty page, a missing next-page link, a fetch failure, or
    /// the page cap.
    pub async fn scrape(&self, username: &Username) -> WatchlistReport {
        let list_url = watchlist_url(&self.base_url, username);
        let mut titles: BTreeSet<Title> = BTreeSet::new();
        let mut status = ScrapeStatus::Complete;
        let mut page = 1u32;

        loop {
            let url = page_url(&list_url, page);

            let markup = match self.fetcher.fetch_page(&url).await {
                Ok(markup) => markup,
                Err(err) => {
                    tracing::warn!(
                        username = %username,
                        page,
                        error = %err,
                        "Watchlist page fetch failed, keeping partial result"
                    );
                    status = ScrapeStatus::Truncated;
                    break;
                }
            };

            let extracted = extract_page(&markup);

            // An empty page means the list ended, whatever the nav says
            if extracted.is_empty() {
                break;
            }

            titles.extend(extracted.titles);

            if !extracted.has_next_page {
                break;
            }

            if page >= self.max_pages {
                tracing::warn!(
                    username = %username,
                    max_pages = self.max_pages,
                    "Page cap reached before end of watchlist"
                );
                status = ScrapeStatus::Truncated;
                break;
            }

            tokio::time::sleep(self.page_delay).await;
            page += 1;
        }

        tracing::info!(
            username = %username,
            titles = titles.len(),
            pages = page,
            status = ?status,
            "Watchlist scraped"
        );

        WatchlistReport {
            username: username.clone(),
            titles,
            status,
            scraped_at: Utc::now(),
        }
    }

    /// Scrape several users, one task per user.
    ///
    /// Pages within a single user's watchlist stay strictly sequential
    /// (the next-page link is only known after the current page), but the
    /// per-user scrapes run in parallel. Reports come back in input order.
    pub async fn scrape_all(&self, usernames: &[Username]) -> Vec<WatchlistReport> {
        let mut tasks = Vec::new();

        for username in usernames {
            let scraper = self.clone();
            let username = username.clone();
            tasks.push(tokio::spawn(
                async move { scraper.scrape(&username).await },
            ));
        }

        let mut reports = Vec::new();
        for (task, username) in tasks.into_iter().zip(usernames) {
            match task.await {
                Ok(report) => reports.push(report),
                Err(err) => {
                    tracing::error!(username = %username, error = %err, "Scrape task failed");
                    reports.push(WatchlistReport {
                        username: username.clone(),
                        titles: BTreeSet::new(),
                        status: ScrapeStatus::Truncated,
                        scraped_at: Utc::now(),
                    });
                }
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fetcher::{FetchError, MockPageFetcher};
    use reqwest::StatusCode;

    const BASE: &str = "https://letterboxd.com";

    fn username(name: &str) -> Username {
        Username::parse(name).unwrap()
    }

    fn page_markup(titles: &[&str], has_next: bool) -> String {
        let posters: String = titles
            .iter()
            .map(|t| format!(r#"<div class="film-poster"><img alt="{t}"></div>"#))
            .collect();
        let nav = if has_next {
            r##"<a class="next" href="#">Next</a>"##
        } else {
            ""
        };
        format!("<html><body>{posters}{nav}</body></html>")
    }

    fn scraper(fetcher: MockPageFetcher, max_pages: u32) -> WatchlistScraper {
        WatchlistScraper::new(Arc::new(fetcher), BASE, Duration::ZERO, max_pages)
    }

    fn expect_page(fetcher: &mut MockPageFetcher, url: &str, markup: String) {
        let expected = url.to_string();
        fetcher
            .expect_fetch_page()
            .withf(move |url| url == expected)
            .times(1)
            .returning(move |_| Ok(markup.clone()));
    }

    #[tokio::test]
    async fn test_single_page_watchlist() {
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Dune", "Arrival"], false),
        );

        let report = scraper(fetcher, 50).scrape(&username("alice")).await;

        assert_eq!(report.status, ScrapeStatus::Complete);
        assert_eq!(
            report.titles,
            BTreeSet::from([Title::from("Arrival"), Title::from("Dune")])
        );
    }

    #[tokio::test]
    async fn test_pagination_stops_after_empty_page() {
        // Pages 1 and 2 have titles and claim a next page; page 3 is empty.
        // Page 4 must never be requested.
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Dune"], true),
        );
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/page/2/",
            page_markup(&["Arrival"], true),
        );
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/page/3/",
            page_markup(&[], true),
        );

        let report = scraper(fetcher, 50).scrape(&username("alice")).await;

        assert_eq!(report.status, ScrapeStatus::Complete);
        assert_eq!(
            report.titles,
            BTreeSet::from([Title::from("Arrival"), Title::from("Dune")])
        );
    }

    #[tokio::test]
    async fn test_duplicates_collapse_across_pages() {
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Heat", "Heat"], true),
        );
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/page/2/",
            page_markup(&["Heat", "Dune"], false),
        );

        let report = scraper(fetcher, 50).scrape(&username("alice")).await;

        assert_eq!(
            report.titles,
            BTreeSet::from([Title::from("Dune"), Title::from("Heat")])
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_on_first_page_yields_empty_truncated() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch_page().times(1).returning(|url| {
            Err(FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        });

        let report = scraper(fetcher, 50).scrape(&username("ghost")).await;

        assert_eq!(report.status, ScrapeStatus::Truncated);
        assert!(report.titles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_mid_list_keeps_earlier_pages() {
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Dune"], true),
        );
        fetcher
            .expect_fetch_page()
            .withf(|url| url == "https://letterboxd.com/alice/watchlist/page/2/")
            .times(1)
            .returning(|url| {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::TOO_MANY_REQUESTS,
                })
            });

        let report = scraper(fetcher, 50).scrape(&username("alice")).await;

        assert_eq!(report.status, ScrapeStatus::Truncated);
        assert_eq!(report.titles, BTreeSet::from([Title::from("Dune")]));
    }

    #[tokio::test]
    async fn test_page_cap_marks_truncated() {
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Dune"], true),
        );
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/page/2/",
            page_markup(&["Arrival"], true),
        );

        // Cap at 2 pages; the claimed page 3 must never be requested
        let report = scraper(fetcher, 2).scrape(&username("alice")).await;

        assert_eq!(report.status, ScrapeStatus::Truncated);
        assert_eq!(report.titles.len(), 2);
    }

    #[tokio::test]
    async fn test_scrape_all_preserves_input_order() {
        let mut fetcher = MockPageFetcher::new();
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/alice/watchlist/",
            page_markup(&["Dune"], false),
        );
        expect_page(
            &mut fetcher,
            "https://letterboxd.com/bob/watchlist/",
            page_markup(&["Heat"], false),
        );

        let users = vec![username("alice"), username("bob")];
        let reports = scraper(fetcher, 50).scrape_all(&users).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].username, users[0]);
        assert_eq!(reports[1].username, users[1]);
        assert_eq!(reports[0].titles, BTreeSet::from([Title::from("Dune")]));
        assert_eq!(reports[1].titles, BTreeSet::from([Title::from("Heat")]));
    }
}
