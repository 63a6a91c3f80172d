//! Cashout stats service
//!
//! Ingests gambling cashout events reported by a browser userscript, stores
//! them per account, and serves aggregate statistics. Cashout amounts arrive
//! in cryptocurrency; USD values are backfilled through a cached third-party
//! price feed with best-effort fallbacks.

pub mod api;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod model;
pub mod pricing;
pub mod services;

// Re-export commonly used types
pub use config::AppConfig;
pub use data::store::CashoutStore;
pub use model::{Account, CashoutRecord, IngestPayload, NormalizedCashout};
pub use pricing::cache::PriceCache;
pub use pricing::fetcher::RateFetcher;
pub use pricing::normalize::CashoutNormalizer;
