pub mod comparison;
pub mod extract;
pub mod fetcher;
pub mod watchlist;

pub use comparison::ComparisonService;
pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use watchlist::WatchlistScraper;
