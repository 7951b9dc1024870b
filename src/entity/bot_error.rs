#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("None of the requested coins were found")]
    NoAssetsResolved,

    #[error("Price service is unavailable: {0}")]
    LookupUnavailable(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),
}
