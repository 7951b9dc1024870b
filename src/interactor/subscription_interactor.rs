use crate::coingecko::{AssetMatch, AssetSearchService, PriceService};
use crate::entity::{AssetResolution, BotError, ResolvedAsset, Subscription, SubscriptionRequest};
use crate::interactor::subscription_repository::SubscriptionRepository;
use crate::services::alert_config::Clock;
use crate::utils::split_asset_list;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};
use std::sync::Arc;

#[async_trait]
pub trait SubscriptionInteractor: Send + Sync {
    /// Maps a free-text list like "btc, eth" to priced assets
    async fn resolve_assets(&self, input: &str) -> Result<AssetResolution>;
    /// Stores one subscription per asset; all or nothing
    async fn create_subscriptions(&self, request: SubscriptionRequest) -> Result<usize>;
    async fn get_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>>;
    async fn delete_subscription(&self, user_id: i64, subscription_id: i64) -> Result<bool>;
}

pub struct SubscriptionInteractorImpl {
    repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    search_service: Arc<dyn AssetSearchService + Send + Sync>,
    price_service: Arc<dyn PriceService + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl SubscriptionInteractorImpl {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository + Send + Sync>,
        search_service: Arc<dyn AssetSearchService + Send + Sync>,
        price_service: Arc<dyn PriceService + Send + Sync>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            search_service,
            price_service,
            clock,
        }
    }
}

#[async_trait]
impl SubscriptionInteractor for SubscriptionInteractorImpl {
    async fn resolve_assets(&self, input: &str) -> Result<AssetResolution> {
        let tokens = split_asset_list(input);
        if tokens.is_empty() {
            return Err(BotError::NoAssetsResolved.into());
        }

        let lookups = join_all(tokens.iter().map(|token| self.search_service.search(token))).await;

        let mut resolution = AssetResolution::default();
        let mut matches: Vec<AssetMatch> = Vec::new();

        for (token, lookup) in tokens.iter().zip(lookups) {
            match lookup {
                Ok(Some(found)) => {
                    // "btc, bitcoin" resolve to the same coin
                    if !matches.iter().any(|m| m.id == found.id) {
                        matches.push(found);
                    }
                }
                Ok(None) => resolution.unresolved.push(token.to_uppercase()),
                Err(e) => {
                    warn!("Lookup of '{}' failed: {}", token, e);
                    return Err(BotError::LookupUnavailable(e.to_string()).into());
                }
            }
        }

        if !matches.is_empty() {
            let ids: Vec<String> = matches.iter().map(|m| m.id.clone()).collect();
            let prices = self
                .price_service
                .get_prices(&ids)
                .await
                .map_err(|e| {
                    if e.is_transient() {
                        anyhow::Error::from(BotError::LookupUnavailable(e.to_string()))
                    } else {
                        anyhow::Error::from(BotError::NoAssetsResolved)
                    }
                })?;

            for found in matches {
                match prices.get(&found.id) {
                    Some(&price) => resolution
                        .resolved
                        .push(ResolvedAsset::new(&found.id, &found.symbol, price)),
                    None => resolution.unresolved.push(found.symbol),
                }
            }
        }

        if resolution.is_empty() {
            return Err(BotError::NoAssetsResolved.into());
        }

        info!(
            "Resolved assets: {} (not found: {:?})",
            resolution.symbols(),
            resolution.unresolved
        );
        Ok(resolution)
    }

    async fn create_subscriptions(&self, request: SubscriptionRequest) -> Result<usize> {
        if request.assets.is_empty() {
            return Err(BotError::NoAssetsResolved.into());
        }

        let user_id = request.user_id;
        let today = self.clock.now().date();
        let rows = request.into_rows(today);
        let ids = self.repository.insert_many(&rows).await?;

        info!("User {} subscribed to {} assets", user_id, ids.len());
        Ok(ids.len())
    }

    async fn get_subscriptions(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.repository.list_for_user(user_id).await
    }

    async fn delete_subscription(&self, user_id: i64, subscription_id: i64) -> Result<bool> {
        let deleted = self
            .repository
            .delete_for_user(user_id, subscription_id)
            .await?;

        if !deleted {
            warn!(
                "User {} tried to delete subscription #{} which they do not own",
                user_id, subscription_id
            );
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coingecko::PriceSourceError;
    use crate::test_support::{
        datetime, new_subscription, InMemorySubscriptionRepository, ScriptedPriceService,
        StaticSearchService,
    };
    use chrono::{NaiveDateTime, NaiveTime};

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn build_interactor(
        repository: Arc<InMemorySubscriptionRepository>,
        search: StaticSearchService,
        prices: ScriptedPriceService,
    ) -> SubscriptionInteractorImpl {
        SubscriptionInteractorImpl::new(
            repository,
            Arc::new(search),
            Arc::new(prices),
            Arc::new(FixedClock(datetime("2025-03-01 20:15"))),
        )
    }

    fn coins() -> StaticSearchService {
        StaticSearchService::new(&[
            ("btc", "bitcoin", "BTC"),
            ("bitcoin", "bitcoin", "BTC"),
            ("eth", "ethereum", "ETH"),
            ("ghost", "ghost-coin", "GHOST"),
        ])
    }

    fn bot_error(err: &anyhow::Error) -> &BotError {
        err.downcast_ref::<BotError>().expect("BotError")
    }

    #[tokio::test]
    async fn known_tokens_are_resolved_with_prices() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let prices = ScriptedPriceService::with_prices(&[("bitcoin", 60000.0), ("ethereum", 3000.0)]);
        let interactor = build_interactor(repository, coins(), prices);

        let resolution = interactor.resolve_assets("BTC, eth, doge, bitcoin").await.unwrap();

        assert_eq!(resolution.symbols(), "BTC, ETH");
        assert_eq!(resolution.resolved[0], ResolvedAsset::new("bitcoin", "BTC", 60000.0));
        assert_eq!(resolution.unresolved, vec!["DOGE".to_string()]);
    }

    #[tokio::test]
    async fn match_without_price_is_unresolved() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let prices = ScriptedPriceService::with_prices(&[("bitcoin", 60000.0)]);
        let interactor = build_interactor(repository, coins(), prices);

        let resolution = interactor.resolve_assets("btc, ghost").await.unwrap();

        assert_eq!(resolution.symbols(), "BTC");
        assert_eq!(resolution.unresolved, vec!["GHOST".to_string()]);
    }

    #[tokio::test]
    async fn nothing_found_is_a_resolution_failure() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let interactor = build_interactor(repository, coins(), ScriptedPriceService::default());

        let err = interactor.resolve_assets("doge, pepe").await.unwrap_err();
        assert!(matches!(bot_error(&err), BotError::NoAssetsResolved));

        let err = interactor.resolve_assets(" , ").await.unwrap_err();
        assert!(matches!(bot_error(&err), BotError::NoAssetsResolved));
    }

    #[tokio::test]
    async fn transient_failure_asks_for_retry() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let prices = ScriptedPriceService::with_prices(&[("bitcoin", 1.0)]);
        let interactor = build_interactor(repository.clone(), coins().failing_on("eth"), prices);

        let err = interactor.resolve_assets("btc, eth").await.unwrap_err();
        assert!(matches!(bot_error(&err), BotError::LookupUnavailable(_)));

        let prices = ScriptedPriceService::with_prices(&[("bitcoin", 1.0)]);
        prices.fail_with(PriceSourceError::Timeout);
        let interactor = build_interactor(repository, coins(), prices);

        let err = interactor.resolve_assets("btc").await.unwrap_err();
        assert!(matches!(bot_error(&err), BotError::LookupUnavailable(_)));
    }

    #[tokio::test]
    async fn permanent_price_failure_means_nothing_found() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let prices = ScriptedPriceService::default();
        prices.fail_with(PriceSourceError::NotFound("bitcoin".to_string()));
        let interactor = build_interactor(repository, coins(), prices);

        let err = interactor.resolve_assets("btc").await.unwrap_err();
        assert!(matches!(bot_error(&err), BotError::NoAssetsResolved));
    }

    #[tokio::test]
    async fn request_creates_one_row_per_asset_dated_today() {
        let repository = Arc::new(InMemorySubscriptionRepository::new());
        let interactor = build_interactor(repository.clone(), coins(), ScriptedPriceService::default());

        let created = interactor
            .create_subscriptions(SubscriptionRequest {
                user_id: 42,
                assets: vec![
                    ResolvedAsset::new("bitcoin", "BTC", 60000.0),
                    ResolvedAsset::new("ethereum", "ETH", 3000.0),
                ],
                interval_days: 1,
                notify_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(created, 2);
        let stored = interactor.get_subscriptions(42).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored
            .iter()
            .all(|s| s.last_check_date == datetime("2025-03-01 00:00").date()));
        assert_eq!(stored[1].last_price, 3000.0);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_user() {
        let repository = Arc::new(InMemorySubscriptionRepository::with_rows(vec![
            new_subscription(1, "bitcoin", "BTC", 1, "09:00", "2025-03-01", 1.0),
            new_subscription(2, "ethereum", "ETH", 1, "09:00", "2025-03-01", 1.0),
        ]));
        let interactor = build_interactor(repository, coins(), ScriptedPriceService::default());

        let mine = interactor.get_subscriptions(1).await.unwrap();

        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].asset_id, "bitcoin");
    }

    #[tokio::test]
    async fn deleting_another_users_subscription_has_no_effect() {
        let repository = Arc::new(InMemorySubscriptionRepository::with_rows(vec![
            new_subscription(1, "bitcoin", "BTC", 1, "09:00", "2025-03-01", 1.0),
            new_subscription(2, "ethereum", "ETH", 1, "09:00", "2025-03-01", 1.0),
        ]));
        let interactor = build_interactor(repository.clone(), coins(), ScriptedPriceService::default());

        assert!(!interactor.delete_subscription(2, 1).await.unwrap());
        assert_eq!(repository.snapshot().len(), 2);

        assert!(interactor.delete_subscription(1, 1).await.unwrap());
        assert_eq!(repository.snapshot().len(), 1);
        assert!(!interactor.delete_subscription(1, 1).await.unwrap());
    }
}
