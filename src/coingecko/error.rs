/// Failure kinds of the CoinGecko adapters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceSourceError {
    #[error("request timed out")]
    Timeout,

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("CoinGecko API error: {0}")]
    Http(String),
}

impl PriceSourceError {
    /// Everything except an unknown asset may succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        !matches!(self, PriceSourceError::NotFound(_))
    }
}

impl From<reqwest::Error> for PriceSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PriceSourceError::Timeout
        } else if err.is_decode() {
            PriceSourceError::Malformed(err.to_string())
        } else {
            PriceSourceError::Http(err.to_string())
        }
    }
}
