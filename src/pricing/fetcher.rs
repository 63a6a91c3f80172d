use std::sync::Arc;
use tracing::warn;

use super::cache::PriceCache;
use super::provider::{provider_id, QuoteProvider};
use super::Clock;

/// Cache-first USD rate lookup.
///
/// Every failure mode (unknown symbol, network error, non-2xx, malformed
/// body, non-positive rate) is recovered locally as `None`; callers degrade
/// USD figures instead of failing the request.
#[derive(Clone)]
pub struct RateFetcher {
    cache: Arc<PriceCache>,
    provider: Arc<dyn QuoteProvider>,
    clock: Arc<dyn Clock>,
}

impl RateFetcher {
    pub fn new(
        cache: Arc<PriceCache>,
        provider: Arc<dyn QuoteProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cache,
            provider,
            clock,
        }
    }

    /// Current USD rate for a lowercase symbol, or `None` if unconvertible.
    /// Issues at most one outbound request per call, and none on a cache hit.
    pub async fn usd_rate(&self, symbol: &str) -> Option<f64> {
        let provider_id = provider_id(symbol)?;

        if let Some(rate) = self.cache.get(symbol, self.clock.now_ms()) {
            return Some(rate);
        }

        match self.provider.usd_quote(provider_id).await {
            Ok(rate) if rate.is_finite() && rate > 0.0 => {
                self.cache.put(symbol, rate, self.clock.now_ms());
                Some(rate)
            }
            Ok(rate) => {
                warn!("discarding non-positive quote {} for {}", rate, symbol);
                None
            }
            Err(e) => {
                warn!("rate fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }
}
