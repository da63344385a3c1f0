//! Watchlist retrieval and comparison engine for Letterboxd.
//!
//! Scrapes 2-4 users' paginated watchlists, intersects them, and either
//! lists the overlap or picks one random shared title. Served over a small
//! HTTP API; the scraping core lives in [`services`].

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
