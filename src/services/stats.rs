use serde::Serialize;
use tracing::debug;

use crate::constants::{paging, stats};
use crate::data::store::CashoutStore;
use crate::error::ApiError;
use crate::model::{Account, NormalizedCashout};
use crate::pricing::fetcher::RateFetcher;
use crate::pricing::normalize::CashoutNormalizer;

/// Display totals for one account, USD figures rounded to cents.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsView {
    pub count: usize,
    pub max_multiplier: f64,
    pub total_payout: f64,
    pub total_amount: f64,
    pub total_payout_crypto: f64,
    pub total_amount_crypto: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub top3: Vec<NormalizedCashout>,
    pub totals: TotalsView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub cashouts: Vec<NormalizedCashout>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Owning account's display name, falling back to its id.
    pub player: String,
    #[serde(flatten)]
    pub cashout: NormalizedCashout,
}

/// Read-side aggregation: summaries, paginated history, leaderboard.
#[derive(Clone)]
pub struct StatsService {
    store: CashoutStore,
    normalizer: CashoutNormalizer,
    fetcher: RateFetcher,
    default_currency: String,
}

impl StatsService {
    pub fn new(
        store: CashoutStore,
        normalizer: CashoutNormalizer,
        fetcher: RateFetcher,
        default_currency: String,
    ) -> Self {
        Self {
            store,
            normalizer,
            fetcher,
            default_currency,
        }
    }

    pub fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        Ok(self.store.list_accounts()?)
    }

    /// Top wins plus totals for one account.
    ///
    /// Older records ingested before the userscript sent USD values leave the
    /// stored USD sums at zero; those sums are then estimated from the crypto
    /// sums and one current rate. The rate comes from the most recently
    /// captured record's currency (default currency when there is none) —
    /// a deliberate approximation, re-rating each record would cost one fetch
    /// per record.
    pub async fn summarize(&self, account_id: &str) -> Result<AccountSummary, ApiError> {
        self.require_account(account_id)?;

        let top = self
            .store
            .top_by_multiplier(account_id, stats::TOP_WINS)?;
        let top3 = self.normalizer.normalize_page(&top).await;

        let totals = self.store.totals(account_id)?;
        let mut total_payout = totals.payout_usd;
        let mut total_amount = totals.amount_usd;

        if totals.count > 0 && (total_payout == 0.0 || total_amount == 0.0) {
            let currency = self
                .store
                .latest_currency(account_id)?
                .unwrap_or_else(|| self.default_currency.clone());
            let rate = self.fetcher.usd_rate(&currency).await.unwrap_or(0.0);
            debug!(
                "estimating USD totals for {} from {} at rate {}",
                account_id, currency, rate
            );
            if total_payout == 0.0 {
                total_payout = totals.payout_crypto * rate;
            }
            if total_amount == 0.0 {
                total_amount = totals.amount_crypto * rate;
            }
        }

        Ok(AccountSummary {
            top3,
            totals: TotalsView {
                count: totals.count,
                max_multiplier: totals.max_multiplier,
                total_payout: round2(total_payout),
                total_amount: round2(total_amount),
                total_payout_crypto: totals.payout_crypto,
                total_amount_crypto: totals.amount_crypto,
            },
        })
    }

    /// One page of an account's cashouts, normalized, newest first.
    pub async fn history(
        &self,
        account_id: &str,
        page: Option<usize>,
        size: Option<usize>,
    ) -> Result<HistoryPage, ApiError> {
        self.require_account(account_id)?;

        let page = clamp_page(page);
        let size = clamp_size(size, paging::DEFAULT_PAGE_SIZE, paging::MAX_PAGE_SIZE);
        let (records, total) = self.store.cashouts_page(account_id, page, size)?;
        let cashouts = self.normalizer.normalize_page(&records).await;

        Ok(HistoryPage {
            page,
            size,
            total,
            cashouts,
        })
    }

    /// Best wins across all accounts: positive multipliers only, multiplier
    /// descending, each entry tagged with the owner's display name.
    pub async fn leaderboard(&self, size: Option<usize>) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let size = clamp_size(
            size,
            paging::DEFAULT_LEADERBOARD_SIZE,
            paging::MAX_LEADERBOARD_SIZE,
        );
        let records = self.store.leaderboard(size)?;
        let cashouts = self.normalizer.normalize_page(&records).await;

        let mut entries = Vec::with_capacity(cashouts.len());
        for cashout in cashouts {
            let player = self
                .store
                .account(&cashout.account_id)?
                .and_then(|a| a.name)
                .unwrap_or_else(|| cashout.account_id.clone());
            entries.push(LeaderboardEntry { player, cashout });
        }
        Ok(entries)
    }

    fn require_account(&self, account_id: &str) -> Result<(), ApiError> {
        if self.store.account(account_id)?.is_none() {
            return Err(ApiError::AccountNotFound(account_id.to_string()));
        }
        Ok(())
    }
}

/// Pages are 1-based; page=0 clamps to 1.
pub fn clamp_page(page: Option<usize>) -> usize {
    page.unwrap_or(1).max(1)
}

pub fn clamp_size(size: Option<usize>, default: usize, max: usize) -> usize {
    size.unwrap_or(default).clamp(1, max)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
