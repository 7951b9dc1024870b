use crate::entity::{BotError, ResolvedAsset, SubscriptionRequest};
use crate::interactor::subscription_interactor::SubscriptionInteractor;
use crate::utils::{parse_interval, parse_notify_time};
use crate::view::subscription_view::SubscriptionView;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use std::sync::Arc;

/// Result of the asset step of the add dialog
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStep {
    /// At least one asset was found; continue with the interval
    Resolved(Vec<ResolvedAsset>),
    /// Nothing matched; the dialog is over
    NotFound,
    /// The lookup failed for a transient reason; ask for the list again
    RetryLater,
}

#[async_trait]
pub trait SubscriptionPresenter: Send + Sync {
    async fn show_welcome(&self) -> Result<()>;
    async fn show_help(&self) -> Result<()>;
    async fn start_add_flow(&self) -> Result<()>;
    async fn submit_assets(&self, input: &str) -> Result<AssetStep>;
    /// Returns the interval once the input is valid
    async fn submit_interval(&self, input: &str) -> Result<Option<u32>>;
    /// Returns true once the dialog is finished
    async fn submit_time(
        &self,
        user_id: i64,
        assets: Vec<ResolvedAsset>,
        interval_days: u32,
        input: &str,
    ) -> Result<bool>;
    async fn show_subscriptions(&self, user_id: i64) -> Result<()>;
    async fn show_delete_menu(&self, user_id: i64) -> Result<()>;
    async fn delete_subscription(&self, user_id: i64, subscription_id: i64) -> Result<bool>;
    async fn cancel(&self) -> Result<()>;
}

pub struct SubscriptionPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
    timezone_label: String,
}

impl<I, V> SubscriptionPresenterImpl<I, V>
where
    I: SubscriptionInteractor,
    V: SubscriptionView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>, timezone_label: String) -> Self {
        Self {
            interactor,
            view,
            timezone_label,
        }
    }
}

#[async_trait]
impl<I, V> SubscriptionPresenter for SubscriptionPresenterImpl<I, V>
where
    I: SubscriptionInteractor + Send + Sync,
    V: SubscriptionView + Send + Sync,
{
    async fn show_welcome(&self) -> Result<()> {
        self.view.display_welcome().await
    }

    async fn show_help(&self) -> Result<()> {
        self.view.display_help(&self.timezone_label).await
    }

    async fn start_add_flow(&self) -> Result<()> {
        self.view.prompt_for_assets().await
    }

    async fn submit_assets(&self, input: &str) -> Result<AssetStep> {
        match self.interactor.resolve_assets(input).await {
            Ok(resolution) => {
                self.view.display_assets_found(&resolution).await?;
                Ok(AssetStep::Resolved(resolution.resolved))
            }
            Err(e) => match e.downcast_ref::<BotError>() {
                Some(BotError::LookupUnavailable(_)) => {
                    self.view.display_lookup_unavailable().await?;
                    Ok(AssetStep::RetryLater)
                }
                Some(BotError::NoAssetsResolved) => {
                    self.view.display_assets_not_found().await?;
                    Ok(AssetStep::NotFound)
                }
                _ => {
                    error!("Failed to resolve assets: {}", e);
                    self.view.display_lookup_unavailable().await?;
                    Ok(AssetStep::RetryLater)
                }
            },
        }
    }

    async fn submit_interval(&self, input: &str) -> Result<Option<u32>> {
        match parse_interval(input) {
            Ok(days) => {
                self.view.prompt_for_time(&self.timezone_label).await?;
                Ok(Some(days))
            }
            Err(e) => {
                self.view.display_invalid_interval(&e.to_string()).await?;
                Ok(None)
            }
        }
    }

    async fn submit_time(
        &self,
        user_id: i64,
        assets: Vec<ResolvedAsset>,
        interval_days: u32,
        input: &str,
    ) -> Result<bool> {
        let notify_time = match parse_notify_time(input) {
            Ok(time) => time,
            Err(e) => {
                self.view.display_invalid_time(&e.to_string()).await?;
                return Ok(false);
            }
        };

        let request = SubscriptionRequest {
            user_id,
            assets,
            interval_days,
            notify_time,
        };

        match self.interactor.create_subscriptions(request).await {
            Ok(count) => {
                self.view
                    .display_subscriptions_created(count, notify_time)
                    .await?;
            }
            Err(e) => {
                error!("Failed to create subscriptions for user {}: {}", user_id, e);
                self.view
                    .display_error("could not save the subscription, please try again".to_string())
                    .await?;
            }
        }

        Ok(true)
    }

    async fn show_subscriptions(&self, user_id: i64) -> Result<()> {
        match self.interactor.get_subscriptions(user_id).await {
            Ok(subscriptions) => self.view.display_subscriptions(&subscriptions).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn show_delete_menu(&self, user_id: i64) -> Result<()> {
        match self.interactor.get_subscriptions(user_id).await {
            Ok(subscriptions) => self.view.display_delete_menu(&subscriptions).await,
            Err(e) => self.view.display_error(e.to_string()).await,
        }
    }

    async fn delete_subscription(&self, user_id: i64, subscription_id: i64) -> Result<bool> {
        let deleted = self
            .interactor
            .delete_subscription(user_id, subscription_id)
            .await?;

        // Telegram rejects an edit that changes nothing
        if let Err(e) = self.show_delete_menu(user_id).await {
            warn!("Failed to refresh delete menu for user {}: {}", user_id, e);
        }
        Ok(deleted)
    }

    async fn cancel(&self) -> Result<()> {
        self.view.display_dialog_cancelled().await
    }
}
