use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::ResolvedAsset;

/// A user's price report subscription for a single asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub asset_id: String,
    pub display_symbol: String,
    pub interval_days: i32,
    pub notify_time: NaiveTime,
    pub last_check_date: NaiveDate,
    pub last_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Whole calendar days since the last successful report, ignoring time of day
    pub fn days_since_last_check(&self, today: NaiveDate) -> i64 {
        (today - self.last_check_date).num_days()
    }

    /// Minute-granularity match of the notification time
    pub fn matches_time(&self, now: NaiveTime) -> bool {
        self.notify_time.hour() == now.hour() && self.notify_time.minute() == now.minute()
    }

    /// A subscription is due when its time matches and the interval has elapsed
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.matches_time(now.time())
            && self.days_since_last_check(now.date()) >= i64::from(self.interval_days)
    }

    pub fn format_notify_time(&self) -> String {
        self.notify_time.format("%H:%M").to_string()
    }
}

/// Row data for a subscription that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: i64,
    pub asset_id: String,
    pub display_symbol: String,
    pub interval_days: i32,
    pub notify_time: NaiveTime,
    pub last_check_date: NaiveDate,
    pub last_price: f64,
}

/// Everything collected by the add dialog, applied in one go on the last step
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    pub user_id: i64,
    pub assets: Vec<ResolvedAsset>,
    pub interval_days: u32,
    pub notify_time: NaiveTime,
}

impl SubscriptionRequest {
    /// Expands the request into one row per asset, using the resolved price as baseline
    pub fn into_rows(self, today: NaiveDate) -> Vec<NewSubscription> {
        let interval_days = i32::try_from(self.interval_days).unwrap_or(i32::MAX);

        self.assets
            .into_iter()
            .map(|asset| NewSubscription {
                user_id: self.user_id,
                asset_id: asset.asset_id,
                display_symbol: asset.display_symbol,
                interval_days,
                notify_time: self.notify_time,
                last_check_date: today,
                last_price: asset.price.max(0.0),
            })
            .collect()
    }
}
