use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::QuoteError;

/// Maps internal lowercase symbols to provider identifiers. Symbols outside
/// this set are permanently unconvertible and never hit the network.
pub fn provider_id(symbol: &str) -> Option<&'static str> {
    Some(match symbol {
        "ltc" => "litecoin",
        "btc" => "bitcoin",
        "eth" => "ethereum",
        "doge" => "dogecoin",
        "bch" => "bitcoin-cash",
        "xrp" => "ripple",
        "usdt" => "tether",
        "usdc" => "usd-coin",
        _ => return None,
    })
}

/// Seam to the external price API so the fetcher can be tested against a
/// counting fake instead of the live endpoint.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// One USD quote for a provider identifier (e.g. "litecoin").
    async fn usd_quote(&self, provider_id: &str) -> Result<f64, QuoteError>;
}

/// CoinGecko simple-price client.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build price provider http client");
        Self { client, base_url }
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    async fn usd_quote(&self, provider_id: &str) -> Result<f64, QuoteError> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url, provider_id
        );
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::Http {
                status: status.as_u16(),
            });
        }

        // Expected body: {"litecoin": {"usd": 65.31}}
        let body: Value = resp.json().await?;
        body.get(provider_id)
            .and_then(|entry| entry.get("usd"))
            .and_then(|usd| usd.as_f64())
            .ok_or_else(|| QuoteError::Malformed(format!("no usd quote for {provider_id}")))
    }
}
