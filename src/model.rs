use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A player account as reported by the upstream platform.
///
/// Created on first-seen ingestion; the display name is refreshed on every
/// later ingestion for the same id. Never deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Stable identifier issued by the upstream platform.
    pub id: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored cashout event, keyed by its upstream-issued external id.
///
/// Crypto fields are always present (absent/invalid inputs coerce to 0);
/// USD fields may be absent and are backfilled at read time.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashoutRecord {
    pub external_id: String,
    pub account_id: String,
    pub game: String,
    /// Lowercase crypto symbol, e.g. "ltc".
    pub currency: String,
    pub amount_crypto: f64,
    pub payout_crypto: f64,
    pub amount_multiplier: f64,
    pub payout_multiplier: f64,
    pub amount_usd: Option<f64>,
    pub payout_usd: Option<f64>,
    /// Upstream-supplied update timestamp, kept as an opaque string.
    pub updated_at_upstream: String,
    /// Set at ingestion, refreshed on every upsert.
    pub captured_at: DateTime<Utc>,
    /// Original request payload, kept for audit/debug only.
    pub raw: Value,
}

/// A cashout with its monetary fields resolved to USD, ready for responses.
/// The crypto originals stay available under the `*Crypto` names.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCashout {
    pub id: String,
    pub account_id: String,
    pub game: String,
    pub currency: String,
    /// Stake in USD.
    pub amount: f64,
    /// Payout in USD.
    pub payout: f64,
    pub amount_crypto: f64,
    pub payout_crypto: f64,
    pub amount_multiplier: f64,
    pub payout_multiplier: f64,
    pub updated_at: String,
    pub captured_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Ingestion payloads
// ---------------------------------------------------------------------------

/// The two request shapes the userscript has shipped over time. The nested
/// shape is current; the flattened one is kept for older script versions.
/// Both reconcile to the same [`IngestRecord`] before anything is persisted.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IngestPayload {
    Nested(NestedPayload),
    Flat(FlatPayload),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NestedPayload {
    pub account: NestedAccount,
    pub cashout: NestedCashout,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NestedAccount {
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedCashout {
    pub id: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub amount_multiplier: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub payout_multiplier: Option<f64>,
    #[serde(default, rename = "amountUSD", deserialize_with = "lenient_opt_f64")]
    pub amount_usd: Option<f64>,
    #[serde(default, rename = "payoutUSD", deserialize_with = "lenient_opt_f64")]
    pub payout_usd: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPayload {
    pub cashout_id: Option<String>,
    pub account_id: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub payout: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub amount_multiplier: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub payout_multiplier: Option<f64>,
    #[serde(default, rename = "amountUSD", deserialize_with = "lenient_opt_f64")]
    pub amount_usd: Option<f64>,
    #[serde(default, rename = "payoutUSD", deserialize_with = "lenient_opt_f64")]
    pub payout_usd: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Canonical internal shape both payload variants reconcile into.
/// Ids stay optional here; validation happens in the ingest service.
#[derive(Clone, Debug)]
pub struct IngestRecord {
    pub account_id: Option<String>,
    pub account_name: Option<String>,
    pub cashout_id: Option<String>,
    pub game: String,
    pub currency: String,
    pub amount_crypto: f64,
    pub payout_crypto: f64,
    pub amount_multiplier: f64,
    pub payout_multiplier: f64,
    pub amount_usd: Option<f64>,
    pub payout_usd: Option<f64>,
    pub updated_at: String,
    pub raw: Value,
}

impl IngestPayload {
    /// Pure mapping from either accepted shape to the canonical record.
    /// `raw` is the original request body, stored alongside for audit.
    pub fn reconcile(self, raw: Value) -> IngestRecord {
        match self {
            IngestPayload::Nested(p) => IngestRecord {
                account_id: p.account.id,
                account_name: p.account.name,
                cashout_id: p.cashout.id,
                game: p.cashout.game.unwrap_or_default(),
                currency: lower(p.cashout.currency),
                amount_crypto: p.cashout.amount.unwrap_or(0.0),
                payout_crypto: p.cashout.payout.unwrap_or(0.0),
                amount_multiplier: p.cashout.amount_multiplier.unwrap_or(0.0),
                payout_multiplier: p.cashout.payout_multiplier.unwrap_or(0.0),
                amount_usd: non_negative(p.cashout.amount_usd),
                payout_usd: non_negative(p.cashout.payout_usd),
                updated_at: p.cashout.updated_at.unwrap_or_default(),
                raw,
            },
            IngestPayload::Flat(p) => IngestRecord {
                account_id: p.account_id,
                account_name: p.account_name,
                cashout_id: p.cashout_id,
                game: p.game.unwrap_or_default(),
                currency: lower(p.currency),
                amount_crypto: p.amount.unwrap_or(0.0),
                payout_crypto: p.payout.unwrap_or(0.0),
                amount_multiplier: p.amount_multiplier.unwrap_or(0.0),
                payout_multiplier: p.payout_multiplier.unwrap_or(0.0),
                amount_usd: non_negative(p.amount_usd),
                payout_usd: non_negative(p.payout_usd),
                updated_at: p.updated_at.unwrap_or_default(),
                raw,
            },
        }
    }
}

fn lower(s: Option<String>) -> String {
    s.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

/// USD fields may be absent but never negative; bad values are dropped.
fn non_negative(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Userscripts are sloppy about number types; accept numbers or numeric
/// strings, anything else becomes absent.
fn lenient_opt_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}
