use futures_util::future::join_all;

use super::fetcher::RateFetcher;
use crate::model::{CashoutRecord, NormalizedCashout};

/// Turns stored cashout records into response-ready records whose `amount`
/// and `payout` are USD, preserving the crypto originals.
///
/// Stored USD values always win over recomputation: they reflect the value at
/// capture time, which may differ from the current market rate. Only records
/// missing a USD field cost a rate lookup, and that lookup usually hits the
/// cache.
#[derive(Clone)]
pub struct CashoutNormalizer {
    fetcher: RateFetcher,
}

impl CashoutNormalizer {
    pub fn new(fetcher: RateFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn normalize(&self, record: &CashoutRecord) -> NormalizedCashout {
        let amount_crypto = num_or_zero(record.amount_crypto);
        let payout_crypto = num_or_zero(record.payout_crypto);

        let (amount, payout) = match (record.amount_usd, record.payout_usd) {
            // Both stored: no fetch at all.
            (Some(amount), Some(payout)) => (amount, payout),
            (stored_amount, stored_payout) => {
                let rate = self.fetcher.usd_rate(&record.currency).await;
                let backfill = |crypto: f64, stored: Option<f64>| {
                    stored.unwrap_or_else(|| rate.map(|r| crypto * r).unwrap_or(0.0))
                };
                (
                    backfill(amount_crypto, stored_amount),
                    backfill(payout_crypto, stored_payout),
                )
            }
        };

        NormalizedCashout {
            id: record.external_id.clone(),
            account_id: record.account_id.clone(),
            game: record.game.clone(),
            currency: record.currency.clone(),
            amount,
            payout,
            amount_crypto,
            payout_crypto,
            amount_multiplier: record.amount_multiplier,
            payout_multiplier: record.payout_multiplier,
            updated_at: record.updated_at_upstream.clone(),
            captured_at: record.captured_at,
        }
    }

    /// Normalizes a page of records concurrently. Output order matches input
    /// order regardless of fetch completion order.
    pub async fn normalize_page(&self, records: &[CashoutRecord]) -> Vec<NormalizedCashout> {
        join_all(records.iter().map(|record| self.normalize(record))).await
    }
}

fn num_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
