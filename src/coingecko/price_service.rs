use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;

use crate::coingecko::client::CoinGeckoClient;
use crate::coingecko::error::PriceSourceError;
use crate::coingecko::models::SimplePriceResponse;

/// Price quotes in the configured unit of account
#[async_trait]
pub trait PriceService: Send + Sync {
    /// Price of a single asset; `NotFound` when the service does not know the id
    async fn get_price(&self, asset_id: &str) -> Result<f64, PriceSourceError>;

    /// Prices for many assets in one request; unknown ids are simply absent
    async fn get_prices(&self, asset_ids: &[String])
        -> Result<HashMap<String, f64>, PriceSourceError>;
}

/// Price service backed by the CoinGecko `/simple/price` endpoint
pub struct CoinGeckoPriceService {
    client: CoinGeckoClient,
}

impl CoinGeckoPriceService {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriceService for CoinGeckoPriceService {
    async fn get_price(&self, asset_id: &str) -> Result<f64, PriceSourceError> {
        let mut prices = self.get_prices(&[asset_id.to_string()]).await?;

        prices
            .remove(asset_id)
            .ok_or_else(|| PriceSourceError::NotFound(asset_id.to_string()))
    }

    async fn get_prices(
        &self,
        asset_ids: &[String],
    ) -> Result<HashMap<String, f64>, PriceSourceError> {
        let ids = join_unique_ids(asset_ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let vs_currency = self.client.config().vs_currency.clone();
        info!("Fetching {} prices for: {}", vs_currency, ids);

        let response: SimplePriceResponse = self
            .client
            .get(
                "simple/price",
                &[("ids", ids.as_str()), ("vs_currencies", vs_currency.as_str())],
            )
            .await?;

        let prices = extract_prices(response, &vs_currency);
        debug!("Received {} prices", prices.len());

        Ok(prices)
    }
}

/// Comma separated, deduplicated id list in first-seen order
pub(crate) fn join_unique_ids(asset_ids: &[String]) -> String {
    let mut seen = Vec::with_capacity(asset_ids.len());
    for id in asset_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen.join(",")
}

/// Keeps assets that have a usable, non-negative quote in `vs_currency`
pub(crate) fn extract_prices(response: SimplePriceResponse, vs_currency: &str) -> HashMap<String, f64> {
    response
        .into_iter()
        .filter_map(|(asset_id, quotes)| {
            quotes
                .get(vs_currency)
                .copied()
                .flatten()
                .filter(|price| price.is_finite() && *price >= 0.0)
                .map(|price| (asset_id, price))
        })
        .collect()
}
