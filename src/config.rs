use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the film-tracking site being scraped
    #[serde(default = "default_letterboxd_base_url")]
    pub letterboxd_base_url: String,

    /// Delay between watchlist page requests, in seconds.
    ///
    /// This is a rate-limit courtesy to the source site, not a tuning knob.
    #[serde(default = "default_page_delay_secs")]
    pub page_delay_secs: u64,

    /// Safety cap on pages fetched per watchlist
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_letterboxd_base_url() -> String {
    "https://letterboxd.com".to_string()
}

fn default_page_delay_secs() -> u64 {
    15
}

fn default_max_pages() -> u32 {
    50
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Inter-page delay as a [`Duration`]
    pub fn page_delay(&self) -> Duration {
        Duration::from_secs(self.page_delay_secs)
    }
}
