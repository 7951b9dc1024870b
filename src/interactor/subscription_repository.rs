use crate::entity::{NewSubscription, Subscription};
use crate::interactor::db;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use std::sync::Arc;

/// Durable storage of subscriptions, shared by the dialog and the scheduler
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Stores every row or none of them
    async fn insert_many(&self, subscriptions: &[NewSubscription]) -> Result<Vec<i64>>;
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>>;
    async fn list_all(&self) -> Result<Vec<Subscription>>;
    /// Returns false when the id does not exist or belongs to another user
    async fn delete_for_user(&self, user_id: i64, subscription_id: i64) -> Result<bool>;
    async fn update_baseline(
        &self,
        subscription_id: i64,
        checked_on: NaiveDate,
        price: f64,
    ) -> Result<bool>;
}

pub struct PgSubscriptionRepository {
    db_pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn insert_many(&self, subscriptions: &[NewSubscription]) -> Result<Vec<i64>> {
        db::insert_subscriptions(&self.db_pool, subscriptions)
            .await
            .map_err(|e| anyhow!("Failed to create subscriptions: {}", e))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        db::get_user_subscriptions(&self.db_pool, user_id)
            .await
            .map_err(|e| anyhow!("Failed to get subscriptions: {}", e))
    }

    async fn list_all(&self) -> Result<Vec<Subscription>> {
        db::get_all_subscriptions(&self.db_pool)
            .await
            .map_err(|e| anyhow!("Failed to load subscriptions: {}", e))
    }

    async fn delete_for_user(&self, user_id: i64, subscription_id: i64) -> Result<bool> {
        db::delete_user_subscription(&self.db_pool, user_id, subscription_id)
            .await
            .map_err(|e| anyhow!("Failed to delete subscription: {}", e))
    }

    async fn update_baseline(
        &self,
        subscription_id: i64,
        checked_on: NaiveDate,
        price: f64,
    ) -> Result<bool> {
        db::update_subscription_baseline(&self.db_pool, subscription_id, checked_on, price)
            .await
            .map_err(|e| anyhow!("Failed to update subscription #{}: {}", subscription_id, e))
    }
}
