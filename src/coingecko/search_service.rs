use async_trait::async_trait;
use log::info;

use crate::coingecko::client::CoinGeckoClient;
use crate::coingecko::error::PriceSourceError;
use crate::coingecko::models::{AssetMatch, SearchResponse};

/// Resolves free-text tickers or names to canonical asset ids
#[async_trait]
pub trait AssetSearchService: Send + Sync {
    /// Best match for the query, `None` when nothing matches
    async fn search(&self, query: &str) -> Result<Option<AssetMatch>, PriceSourceError>;
}

/// Name lookup backed by the CoinGecko `/search` endpoint
pub struct CoinGeckoSearchService {
    client: CoinGeckoClient,
}

impl CoinGeckoSearchService {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssetSearchService for CoinGeckoSearchService {
    async fn search(&self, query: &str) -> Result<Option<AssetMatch>, PriceSourceError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(None);
        }

        let response: SearchResponse = self.client.get("search", &[("query", query.as_str())]).await?;
        let best = top_match(response);

        match &best {
            Some(asset) => info!(
                "Resolved '{}' to {} ({}, {})",
                query, asset.id, asset.symbol, asset.name
            ),
            None => info!("No coin found for '{}'", query),
        }

        Ok(best)
    }
}

/// CoinGecko orders results by relevance, so the first coin wins
pub(crate) fn top_match(response: SearchResponse) -> Option<AssetMatch> {
    response.coins.into_iter().next().map(AssetMatch::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_result_is_the_match() {
        let response: SearchResponse = serde_json::from_value(json!({
            "coins": [
                { "id": "toncoin", "symbol": "ton", "name": "Toncoin", "market_cap_rank": 12 },
                { "id": "tokamak-network", "symbol": "TON", "name": "Tokamak Network" }
            ]
        }))
        .unwrap();

        let best = top_match(response).unwrap();

        assert_eq!(best.id, "toncoin");
        assert_eq!(best.symbol, "TON");
        assert_eq!(best.name, "Toncoin");
    }

    #[test]
    fn no_coins_means_no_match() {
        let response: SearchResponse =
            serde_json::from_value(json!({ "exchanges": [], "categories": [] })).unwrap();
        assert!(top_match(response).is_none());
    }
}
