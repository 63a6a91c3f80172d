//! Application-wide constants and magic numbers.
//!
//! Centralized so the tunables live in one place instead of scattered
//! through handlers and services.

/// Pricing and rate-cache constants
pub mod pricing {
    /// Maximum age at which a cached quote is still served (60 s).
    pub const FRESHNESS_WINDOW_MS: i64 = 60_000;

    /// Outbound request timeout for the price provider.
    pub const REQUEST_TIMEOUT_SECS: u64 = 5;

    /// Currency used for the aggregation fallback estimate when an account
    /// has no record with a usable currency.
    pub const DEFAULT_CURRENCY: &str = "ltc";
}

/// Pagination limits for the read endpoints
pub mod paging {
    /// Hard cap on per-page size for cashout history.
    pub const MAX_PAGE_SIZE: usize = 200;

    /// Page size when the client doesn't ask for one.
    pub const DEFAULT_PAGE_SIZE: usize = 25;

    /// Hard cap on leaderboard size.
    pub const MAX_LEADERBOARD_SIZE: usize = 50;

    /// Leaderboard size when the client doesn't ask for one.
    pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
}

/// Summary/statistics constants
pub mod stats {
    /// Number of top wins returned in an account summary.
    pub const TOP_WINS: usize = 3;
}
