use chrono::Utc;
use tracing::info;

use crate::data::store::CashoutStore;
use crate::error::ApiError;
use crate::model::{CashoutRecord, IngestRecord};

/// Outcome of one accepted ingestion call.
#[derive(Clone, Debug)]
pub struct IngestOutcome {
    pub cashout_id: String,
    pub account_id: String,
    /// false when the cashout id already existed and was refreshed.
    pub inserted: bool,
}

/// Validates reconciled payloads and performs the account + cashout upserts.
#[derive(Clone)]
pub struct IngestService {
    store: CashoutStore,
}

impl IngestService {
    pub fn new(store: CashoutStore) -> Self {
        Self { store }
    }

    /// Idempotent by cashout external id: re-ingesting the same id refreshes
    /// the stored record instead of duplicating it. Nothing is written when
    /// validation fails.
    pub fn ingest(&self, record: IngestRecord) -> Result<IngestOutcome, ApiError> {
        let account_id = require(record.account_id.as_deref(), "account id")?;
        let cashout_id = require(record.cashout_id.as_deref(), "cashout id")?;

        let now = Utc::now();
        self.store
            .upsert_account(&account_id, record.account_name.clone(), now)?;

        let inserted = self.store.upsert_cashout(CashoutRecord {
            external_id: cashout_id.clone(),
            account_id: account_id.clone(),
            game: record.game,
            currency: record.currency,
            amount_crypto: record.amount_crypto,
            payout_crypto: record.payout_crypto,
            amount_multiplier: record.amount_multiplier,
            payout_multiplier: record.payout_multiplier,
            amount_usd: record.amount_usd,
            payout_usd: record.payout_usd,
            updated_at_upstream: record.updated_at,
            captured_at: now,
            raw: record.raw,
        })?;

        info!(
            "ingested cashout {} for account {} ({})",
            cashout_id,
            account_id,
            if inserted { "new" } else { "refreshed" }
        );

        Ok(IngestOutcome {
            cashout_id,
            account_id,
            inserted,
        })
    }
}

fn require(value: Option<&str>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::Validation(field.to_string())),
    }
}
