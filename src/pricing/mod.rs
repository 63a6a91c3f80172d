//! USD normalization core: price cache, rate fetching, and the cashout
//! normalizer that backfills USD values onto stored records.

pub mod cache;
pub mod fetcher;
pub mod normalize;
pub mod provider;

#[cfg(test)]
mod fetcher_tests;

/// Injectable clock so cache freshness is deterministic under test.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time, used everywhere outside tests.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
