mod api;
mod config;
mod constants;
mod data;
mod error;
mod model;
mod pricing;
mod services;

use std::sync::Arc;
use std::time::Duration;

use api::{run_server, AppState};
use config::AppConfig;
use data::store::CashoutStore;
use pricing::cache::PriceCache;
use pricing::fetcher::RateFetcher;
use pricing::normalize::CashoutNormalizer;
use pricing::provider::CoinGeckoProvider;
use pricing::SystemClock;
use services::ingest::IngestService;
use services::stats::StatsService;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Setup Logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting cashout stats service...");

    // Load Configuration (.env first so API_TOKEN can come from there)
    dotenvy::dotenv().ok();
    let config = AppConfig::load();
    info!(
        "Loaded configuration: provider={}, freshness={}ms",
        config.pricing.provider_base_url, config.pricing.freshness_ms
    );
    if config.api.token.is_none() {
        warn!("no API token configured - endpoints are unauthenticated");
    }

    // Pricing core
    let cache = Arc::new(PriceCache::new(config.pricing.freshness_ms));
    let provider = Arc::new(CoinGeckoProvider::new(
        config.pricing.provider_base_url.clone(),
        Duration::from_secs(config.pricing.request_timeout_secs),
    ));
    let fetcher = RateFetcher::new(cache, provider, Arc::new(SystemClock));
    let normalizer = CashoutNormalizer::new(fetcher.clone());

    // Store and services
    let store = CashoutStore::new();
    let ingest = IngestService::new(store.clone());
    let stats = StatsService::new(
        store,
        normalizer,
        fetcher,
        config.pricing.default_currency.clone(),
    );

    let state = Arc::new(AppState {
        config,
        ingest,
        stats,
    });

    info!("Initializing API server...");
    run_server(state).await;
}
