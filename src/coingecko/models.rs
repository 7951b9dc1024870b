use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response of `GET /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// Response of `GET /simple/price`: asset id -> currency -> price
pub type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// Best match returned by the name lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMatch {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

impl From<SearchCoin> for AssetMatch {
    fn from(coin: SearchCoin) -> Self {
        Self {
            id: coin.id,
            symbol: coin.symbol.to_uppercase(),
            name: coin.name,
        }
    }
}

/// Error bodies CoinGecko returns with or without a failing status code
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status: Option<ErrorStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorStatus {
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }

        self.status.as_ref().and_then(|status| {
            status.error_message.as_ref().map(|message| match status.error_code {
                Some(code) => format!("{} ({})", message, code),
                None => message.clone(),
            })
        })
    }
}
