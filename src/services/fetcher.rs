use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::AppResult,
    models::Username,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("overlap-api/", env!("CARGO_PKG_VERSION"));

/// Builds the first-page URL for a user's watchlist
pub fn watchlist_url(base_url: &str, username: &Username) -> String {
    format!("{}/{}/watchlist/", base_url.trim_end_matches('/'), username)
}

/// Page 1 is the bare watchlist URL; deeper pages append `page/N/`
pub fn page_url(watchlist_url: &str, page: u32) -> String {
    if page > 1 {
        format!("{watchlist_url}page/{page}/")
    } else {
        watchlist_url.to_string()
    }
}

/// A failed page request. Either the transport broke or the site answered
/// with a non-success status.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// One GET per watchlist page.
///
/// A trait seam so the scrape loop can run against a mocked fetcher in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page, returning the raw HTML body
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// Production fetcher backed by a shared reqwest client
#[derive(Clone)]
pub struct HttpPageFetcher {
    http_client: HttpClient,
}

impl HttpPageFetcher {
    /// Builds a client with a request timeout and a descriptive User-Agent
    pub fn new() -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Username;

    fn username(name: &str) -> Username {
        Username::parse(name).unwrap()
    }

    #[test]
    fn test_watchlist_url() {
        assert_eq!(
            watchlist_url("https://letterboxd.com", &username("alice")),
            "https://letterboxd.com/alice/watchlist/"
        );
    }

    #[test]
    fn test_watchlist_url_trailing_slash_collapses() {
        assert_eq!(
            watchlist_url("https://letterboxd.com/", &username("alice")),
            "https://letterboxd.com/alice/watchlist/"
        );
    }

    #[test]
    fn test_page_url_first_page_is_bare() {
        let list = "https://letterboxd.com/alice/watchlist/";
        assert_eq!(page_url(list, 1), list);
    }

    #[test]
    fn test_page_url_deeper_pages() {
        let list = "https://letterboxd.com/alice/watchlist/";
        assert_eq!(page_url(list, 2), format!("{list}page/2/"));
        assert_eq!(page_url(list, 17), format!("{list}page/17/"));
    }
}
