use serde::Deserialize;
use std::env;
use std::fs;

use crate::constants;

#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// Bearer token required on every endpoint except `/` and `/health`.
    /// When unset, auth is disabled (local development only).
    pub token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PricingConfig {
    pub provider_base_url: String,

    #[serde(default = "default_freshness_ms")]
    pub freshness_ms: i64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_freshness_ms() -> i64 {
    constants::pricing::FRESHNESS_WINDOW_MS
}

fn default_request_timeout_secs() -> u64 {
    constants::pricing::REQUEST_TIMEOUT_SECS
}

fn default_currency() -> String {
    constants::pricing::DEFAULT_CURRENCY.to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub pricing: PricingConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        let config_path = "config.yaml";
        let content = fs::read_to_string(config_path).expect("Failed to read config.yaml");

        let mut config = Self::from_yaml(&content);

        // API_TOKEN from the environment wins over the file so the secret
        // doesn't have to live in the repo.
        if let Ok(token) = env::var("API_TOKEN") {
            if !token.is_empty() {
                config.api.token = Some(token);
            }
        }
        config
    }

    pub fn from_yaml(content: &str) -> Self {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let config: AppConfig =
            serde_yaml::from_str(content).expect("Failed to parse config.yaml");
        config
    }
}
