use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::model::{Account, CashoutRecord};

/// Raw per-account aggregates, before any fallback estimation or rounding.
#[derive(Clone, Copy, Debug, Default)]
pub struct CashoutTotals {
    pub count: usize,
    pub max_multiplier: f64,
    pub payout_usd: f64,
    pub amount_usd: f64,
    pub payout_crypto: f64,
    pub amount_crypto: f64,
}

/// In-memory document store for accounts and cashouts.
///
/// Both collections are keyed by upstream-issued external ids, so every write
/// is an idempotent upsert. A cheap `Clone` handle shares the same documents.
#[derive(Clone, Debug)]
pub struct CashoutStore {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    cashouts: Arc<Mutex<HashMap<String, CashoutRecord>>>,
}

impl Default for CashoutStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CashoutStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            cashouts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert-if-absent on account id; an existing account only gets its
    /// display name refreshed (when the payload carried one).
    pub fn upsert_account(
        &self,
        id: &str,
        name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().map_err(|_| StoreError::LockPoisoned)?;
        let account = accounts
            .entry(id.to_string())
            .or_insert_with(|| Account {
                id: id.to_string(),
                name: None,
                created_at: now,
            });
        if name.is_some() {
            account.name = name;
        }
        Ok(account.clone())
    }

    /// Insert-if-absent on cashout external id; on conflict the whole record
    /// is replaced, refreshing mutable fields and the capture timestamp.
    /// Returns true when the record was newly inserted.
    pub fn upsert_cashout(&self, record: CashoutRecord) -> Result<bool, StoreError> {
        let mut cashouts = self.cashouts.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(cashouts.insert(record.external_id.clone(), record).is_none())
    }

    pub fn account(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(accounts.get(id).cloned())
    }

    /// All accounts, newest first.
    pub fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    /// One page of an account's cashouts, newest capture first. `page` is
    /// 1-based. Also returns the total record count for the account.
    pub fn cashouts_page(
        &self,
        account_id: &str,
        page: usize,
        size: usize,
    ) -> Result<(Vec<CashoutRecord>, usize), StoreError> {
        let mut records = self.records_for(account_id)?;
        records.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        let total = records.len();
        let skip = page.saturating_sub(1).saturating_mul(size);
        let page_records = records.into_iter().skip(skip).take(size).collect();
        Ok((page_records, total))
    }

    /// The account's `n` records with the highest payout multiplier. Ties
    /// keep their relative order (stable sort, arbitrary but consistent).
    pub fn top_by_multiplier(
        &self,
        account_id: &str,
        n: usize,
    ) -> Result<Vec<CashoutRecord>, StoreError> {
        let mut records = self.records_for(account_id)?;
        records.sort_by(|a, b| {
            b.payout_multiplier
                .partial_cmp(&a.payout_multiplier)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records.truncate(n);
        Ok(records)
    }

    /// Aggregates over all of an account's records. Absent USD fields count
    /// as zero here; the stats service decides whether to estimate instead.
    pub fn totals(&self, account_id: &str) -> Result<CashoutTotals, StoreError> {
        let records = self.records_for(account_id)?;
        let mut totals = CashoutTotals {
            count: records.len(),
            ..Default::default()
        };
        for record in &records {
            totals.max_multiplier = totals.max_multiplier.max(record.payout_multiplier);
            totals.payout_usd += record.payout_usd.unwrap_or(0.0);
            totals.amount_usd += record.amount_usd.unwrap_or(0.0);
            totals.payout_crypto += record.payout_crypto;
            totals.amount_crypto += record.amount_crypto;
        }
        Ok(totals)
    }

    /// Currency of the account's most recently captured record with a
    /// non-empty currency, used by the aggregation fallback.
    pub fn latest_currency(&self, account_id: &str) -> Result<Option<String>, StoreError> {
        let mut records = self.records_for(account_id)?;
        records.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
        Ok(records
            .into_iter()
            .map(|r| r.currency)
            .find(|c| !c.is_empty()))
    }

    /// Cross-account scan for the leaderboard: positive-multiplier records
    /// only, ranked by multiplier descending.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<CashoutRecord>, StoreError> {
        let cashouts = self.cashouts.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut records: Vec<CashoutRecord> = cashouts
            .values()
            .filter(|r| r.payout_multiplier > 0.0)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.payout_multiplier
                .partial_cmp(&a.payout_multiplier)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        records.truncate(limit);
        Ok(records)
    }

    fn records_for(&self, account_id: &str) -> Result<Vec<CashoutRecord>, StoreError> {
        let cashouts = self.cashouts.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(cashouts
            .values()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect())
    }
}
