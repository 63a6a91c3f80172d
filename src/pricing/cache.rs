use dashmap::DashMap;

/// One cached USD rate for a symbol.
#[derive(Clone, Copy, Debug)]
pub struct PriceQuote {
    /// USD per unit, always positive.
    pub rate: f64,
    pub fetched_at_ms: i64,
}

/// Most recently fetched USD rate per crypto symbol, with a freshness window.
///
/// Single source of truth for "is this rate usable now". Quotes are soft,
/// regenerable state: populated lazily, never persisted, rebuilt from zero on
/// restart. Concurrent refreshes of the same symbol race benignly (both fetch
/// the same external truth, last write wins). No eviction beyond
/// overwrite-on-refresh; the symbol set is a short fixed allow-list.
pub struct PriceCache {
    quotes: DashMap<String, PriceQuote>,
    freshness_ms: i64,
}

impl PriceCache {
    pub fn new(freshness_ms: i64) -> Self {
        Self {
            quotes: DashMap::new(),
            freshness_ms,
        }
    }

    /// Returns the cached rate only while it is fresh. A stale quote is
    /// reported as absent, never silently served.
    pub fn get(&self, symbol: &str, now_ms: i64) -> Option<f64> {
        self.quotes.get(symbol).and_then(|quote| {
            if now_ms - quote.fetched_at_ms < self.freshness_ms {
                Some(quote.rate)
            } else {
                None
            }
        })
    }

    pub fn put(&self, symbol: &str, rate: f64, now_ms: i64) {
        self.quotes.insert(
            symbol.to_string(),
            PriceQuote {
                rate,
                fetched_at_ms: now_ms,
            },
        );
    }
}
