use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use overlap_api::{
    api::{create_router, AppState},
    config::Config,
    services::{ComparisonService, HttpPageFetcher, WatchlistScraper},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "overlap_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fetcher = Arc::new(HttpPageFetcher::new()?);
    let scraper = WatchlistScraper::new(
        fetcher,
        config.letterboxd_base_url.clone(),
        config.page_delay(),
        config.max_pages,
    );
    let state = AppState::new(ComparisonService::new(scraper));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "overlap-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
