//! Unit tests for the rate fetcher: cache-first lookup, outbound call
//! counting, and failure absorption.

#[cfg(test)]
mod fetcher_tests {
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::error::QuoteError;
    use crate::pricing::cache::PriceCache;
    use crate::pricing::fetcher::RateFetcher;
    use crate::pricing::provider::{provider_id, QuoteProvider};
    use crate::pricing::Clock;

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FixedProvider {
        rate: Result<f64, ()>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn ok(rate: f64) -> Self {
            Self {
                rate: Ok(rate),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                rate: Err(()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for FixedProvider {
        async fn usd_quote(&self, _provider_id: &str) -> Result<f64, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate
                .map_err(|_| QuoteError::Http { status: 500 })
        }
    }

    fn fetcher(
        provider: Arc<FixedProvider>,
        clock: Arc<ManualClock>,
        freshness_ms: i64,
    ) -> RateFetcher {
        RateFetcher::new(Arc::new(PriceCache::new(freshness_ms)), provider, clock)
    }

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(provider_id("ltc"), Some("litecoin"));
        assert_eq!(provider_id("btc"), Some("bitcoin"));
        assert_eq!(provider_id("bch"), Some("bitcoin-cash"));
        assert_eq!(provider_id("usdc"), Some("usd-coin"));
        assert_eq!(provider_id("zzz"), None);
        assert_eq!(provider_id("LTC"), None); // mapping is lowercase only
    }

    #[tokio::test]
    async fn test_second_fetch_within_window_hits_cache() {
        let provider = Arc::new(FixedProvider::ok(65.0));
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let fetcher = fetcher(provider.clone(), clock.clone(), 60_000);

        assert_eq!(fetcher.usd_rate("ltc").await, Some(65.0));
        clock.advance(59_999);
        assert_eq!(fetcher.usd_rate("ltc").await, Some(65.0));

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_after_expiry_issues_new_call() {
        let provider = Arc::new(FixedProvider::ok(65.0));
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let fetcher = fetcher(provider.clone(), clock.clone(), 60_000);

        assert_eq!(fetcher.usd_rate("ltc").await, Some(65.0));
        clock.advance(60_000);
        assert_eq!(fetcher.usd_rate("ltc").await, Some(65.0));

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_unknown_symbol_never_hits_network() {
        let provider = Arc::new(FixedProvider::ok(65.0));
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let fetcher = fetcher(provider.clone(), clock, 60_000);

        assert_eq!(fetcher.usd_rate("zzz").await, None);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_is_absorbed() {
        let provider = Arc::new(FixedProvider::failing());
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let fetcher = fetcher(provider.clone(), clock, 60_000);

        assert_eq!(fetcher.usd_rate("ltc").await, None);
        // Failures are not cached; the next call tries again.
        assert_eq!(fetcher.usd_rate("ltc").await, None);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_rejected() {
        let provider = Arc::new(FixedProvider::ok(0.0));
        let clock = Arc::new(ManualClock(AtomicI64::new(0)));
        let fetcher = fetcher(provider.clone(), clock, 60_000);

        assert_eq!(fetcher.usd_rate("ltc").await, None);
    }
}
