use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use teloxide::Bot;

use crate::coingecko::{
    AssetSearchService, CoinGeckoClient, CoinGeckoPriceService, CoinGeckoSearchService,
    Config as CoinGeckoConfig, PriceService,
};
use crate::interactor::subscription_interactor::SubscriptionInteractorImpl;
use crate::interactor::subscription_repository::{
    PgSubscriptionRepository, SubscriptionRepository,
};
use crate::services::alert_config::{AlertConfig, Clock, SystemClock};
use crate::view::report_view::{MessageTransport, TelegramTransport};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn MessageTransport + Send + Sync>,

    // CoinGecko services
    price_service: Arc<dyn PriceService + Send + Sync>,
    search_service: Arc<dyn AssetSearchService + Send + Sync>,

    // Configuration
    coingecko_config: CoinGeckoConfig,
    alert_config: AlertConfig,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(db_pool: Arc<PgPool>, bot: Bot) -> Result<Self> {
        let coingecko_config = CoinGeckoConfig::from_env();
        let alert_config = AlertConfig::from_env();

        let client = CoinGeckoClient::new(coingecko_config.clone())
            .context("Failed to create CoinGecko client")?;

        let price_service = Arc::new(CoinGeckoPriceService::new(client.clone()))
            as Arc<dyn PriceService + Send + Sync>;
        let search_service = Arc::new(CoinGeckoSearchService::new(client))
            as Arc<dyn AssetSearchService + Send + Sync>;

        let repository = Arc::new(PgSubscriptionRepository::new(db_pool))
            as Arc<dyn SubscriptionRepository + Send + Sync>;
        let clock = Arc::new(SystemClock::new(alert_config.utc_offset)) as Arc<dyn Clock>;
        let transport =
            Arc::new(TelegramTransport::new(bot)) as Arc<dyn MessageTransport + Send + Sync>;

        Ok(Self {
            repository,
            clock,
            transport,
            price_service,
            search_service,
            coingecko_config,
            alert_config,
        })
    }

    // Accessor methods

    pub fn repository(&self) -> Arc<dyn SubscriptionRepository + Send + Sync> {
        self.repository.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    pub fn transport(&self) -> Arc<dyn MessageTransport + Send + Sync> {
        self.transport.clone()
    }

    pub fn price_service(&self) -> Arc<dyn PriceService + Send + Sync> {
        self.price_service.clone()
    }

    pub fn search_service(&self) -> Arc<dyn AssetSearchService + Send + Sync> {
        self.search_service.clone()
    }

    pub fn coingecko_config(&self) -> CoinGeckoConfig {
        self.coingecko_config.clone()
    }

    pub fn alert_config(&self) -> AlertConfig {
        self.alert_config.clone()
    }

    pub fn subscription_interactor(&self) -> Arc<SubscriptionInteractorImpl> {
        Arc::new(SubscriptionInteractorImpl::new(
            self.repository(),
            self.search_service(),
            self.price_service(),
            self.clock(),
        ))
    }
}
