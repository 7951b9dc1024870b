use serde::{Deserialize, Serialize};

/// An asset the name lookup recognized, with the price used as initial baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    pub asset_id: String,       // CoinGecko id, e.g. "bitcoin"
    pub display_symbol: String, // Ticker shown to the user, e.g. "BTC"
    pub price: f64,
}

impl ResolvedAsset {
    pub fn new(asset_id: &str, display_symbol: &str, price: f64) -> Self {
        Self {
            asset_id: asset_id.to_string(),
            display_symbol: display_symbol.to_uppercase(),
            price,
        }
    }
}

/// Outcome of resolving a free-text asset list
#[derive(Debug, Clone, Default)]
pub struct AssetResolution {
    pub resolved: Vec<ResolvedAsset>,
    pub unresolved: Vec<String>,
}

impl AssetResolution {
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn symbols(&self) -> String {
        self.resolved
            .iter()
            .map(|asset| asset.display_symbol.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
