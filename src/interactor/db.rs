use crate::entity::{NewSubscription, Subscription};
use chrono::NaiveDate;
use log::info;
use sqlx::{Error as SqlxError, PgPool, Row};

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, asset_id, display_symbol, interval_days, \
     notify_time, last_check_date, last_price, created_at";

// Insert all rows of one subscription request in a single transaction
pub async fn insert_subscriptions(
    pool: &PgPool,
    subscriptions: &[NewSubscription],
) -> Result<Vec<i64>, SqlxError> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(subscriptions.len());

    for sub in subscriptions {
        let row = sqlx::query(
            "INSERT INTO subscriptions (user_id, asset_id, display_symbol, interval_days, notify_time, last_check_date, last_price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(sub.user_id)
        .bind(&sub.asset_id)
        .bind(&sub.display_symbol)
        .bind(sub.interval_days)
        .bind(sub.notify_time)
        .bind(sub.last_check_date)
        .bind(sub.last_price)
        .fetch_one(&mut *tx)
        .await?;

        ids.push(row.try_get::<i64, _>("id")?);
    }

    tx.commit().await?;
    info!(
        "Created {} subscriptions with IDs: {:?}",
        ids.len(),
        ids
    );

    Ok(ids)
}

// Get subscriptions of a single user
pub async fn get_user_subscriptions(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<Subscription>, SqlxError> {
    let query = format!(
        "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY id",
        SUBSCRIPTION_COLUMNS
    );

    sqlx::query_as::<_, Subscription>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

// Full table scan used by the scheduler
pub async fn get_all_subscriptions(pool: &PgPool) -> Result<Vec<Subscription>, SqlxError> {
    let query = format!("SELECT {} FROM subscriptions ORDER BY id", SUBSCRIPTION_COLUMNS);

    sqlx::query_as::<_, Subscription>(&query)
        .fetch_all(pool)
        .await
}

// Delete a subscription only if it belongs to the user
pub async fn delete_user_subscription(
    pool: &PgPool,
    user_id: i64,
    subscription_id: i64,
) -> Result<bool, SqlxError> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND user_id = $2")
        .bind(subscription_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(
            "Deleted subscription #{} of user {}",
            subscription_id, user_id
        );
    }

    Ok(deleted)
}

// Record the price and date of a delivered report
pub async fn update_subscription_baseline(
    pool: &PgPool,
    subscription_id: i64,
    checked_on: NaiveDate,
    price: f64,
) -> Result<bool, SqlxError> {
    let result =
        sqlx::query("UPDATE subscriptions SET last_check_date = $1, last_price = $2 WHERE id = $3")
            .bind(checked_on)
            .bind(price)
            .bind(subscription_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
