use log::warn;
use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_VS_CURRENCY: &str = "usd";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// CoinGecko API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the public API
    pub api_url: String,

    /// Optional demo API key, sent as `x-cg-demo-api-key`
    pub api_key: Option<String>,

    /// Unit of account for every quote
    pub vs_currency: String,

    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Builds the configuration from environment variables
    pub fn from_env() -> Self {
        let timeout_secs = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "HTTP_TIMEOUT_SECS={} is not a number, using {}",
                    value, DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Self {
            api_url: env::var("COINGECKO_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_key: env::var("COINGECKO_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            vs_currency: env::var("VS_CURRENCY")
                .map(|currency| currency.to_lowercase())
                .unwrap_or_else(|_| DEFAULT_VS_CURRENCY.to_string()),
            request_timeout: Duration::from_secs(timeout_secs.max(1)),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }
}
