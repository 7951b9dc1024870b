// src/coingecko/mod.rs
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod price_service;
pub mod search_service;

pub use client::CoinGeckoClient;
pub use config::Config;
pub use error::PriceSourceError;
pub use models::AssetMatch;
pub use price_service::{CoinGeckoPriceService, PriceService};
pub use search_service::{AssetSearchService, CoinGeckoSearchService};
