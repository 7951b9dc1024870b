use anyhow::anyhow;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::coingecko::error::PriceSourceError;
use crate::coingecko::models::ErrorResponse;
use crate::coingecko::Config;

/// Thin HTTP wrapper shared by the CoinGecko services
#[derive(Clone)]
pub struct CoinGeckoClient {
    http_client: Client,
    config: Config,
}

impl CoinGeckoClient {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Performs a GET request against the API and decodes the JSON body
    pub async fn get<D>(&self, path: &str, query: &[(&str, &str)]) -> Result<D, PriceSourceError>
    where
        D: DeserializeOwned,
    {
        let url = format!("{}/{}", self.config.api_url, path.trim_start_matches('/'));
        debug!("CoinGecko request: {} {:?}", url, query);

        let mut request = self.http_client.get(&url).query(query);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("x-cg-demo-api-key", api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!("CoinGecko request to {} failed: {}", path, e);
            PriceSourceError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body).map_err(|e| {
            error!("CoinGecko API error [{}]: {}", path, e);
            e
        })
    }
}

/// Maps a status line and body to the payload or a typed error
pub(crate) fn decode_response<D>(status: StatusCode, body: &str) -> Result<D, PriceSourceError>
where
    D: DeserializeOwned,
{
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|err| err.message())
            .unwrap_or_else(|| body.trim().to_string());
        return Err(PriceSourceError::Http(format!("{}: {}", status, message)));
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PriceSourceError::Malformed(e.to_string()))?;

    check_for_api_error(value)
}

// Only an object made of nothing but `error`/`status` is an error envelope;
// price maps may contain a coin with either id
fn is_error_envelope(value: &serde_json::Value) -> bool {
    value.as_object().is_some_and(|fields| {
        !fields.is_empty() && fields.keys().all(|key| key == "error" || key == "status")
    })
}

/// Rejects error bodies delivered with a success status, then decodes the payload
pub(crate) fn check_for_api_error<D>(value: serde_json::Value) -> Result<D, PriceSourceError>
where
    D: DeserializeOwned,
{
    if is_error_envelope(&value) {
        if let Ok(err) = serde_json::from_value::<ErrorResponse>(value.clone()) {
            if let Some(message) = err.message() {
                return Err(PriceSourceError::Http(message));
            }
        }
    }

    serde_json::from_value(value).map_err(|e| PriceSourceError::Malformed(e.to_string()))
}
