//! In-memory fakes for the store, the CoinGecko services and the transport,
//! plus one-shot local HTTP servers for the CoinGecko client
use crate::coingecko::{AssetMatch, AssetSearchService, PriceService, PriceSourceError};
use crate::entity::{NewSubscription, Subscription};
use crate::interactor::subscription_repository::SubscriptionRepository;
use crate::view::report_view::MessageTransport;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

pub fn datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
}

pub fn new_subscription(
    user_id: i64,
    asset_id: &str,
    symbol: &str,
    interval_days: i32,
    notify_time: &str,
    last_check: &str,
    last_price: f64,
) -> NewSubscription {
    NewSubscription {
        user_id,
        asset_id: asset_id.to_string(),
        display_symbol: symbol.to_string(),
        interval_days,
        notify_time: NaiveTime::parse_from_str(notify_time, "%H:%M").unwrap(),
        last_check_date: date(last_check),
        last_price,
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<Vec<Subscription>>,
    next_id: Mutex<i64>,
    fail_scans: Mutex<bool>,
    failing_updates: Mutex<HashSet<i64>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<NewSubscription>) -> Self {
        let repository = Self::new();
        repository.insert_rows(&rows);
        repository
    }

    pub fn snapshot(&self) -> Vec<Subscription> {
        self.rows.lock().unwrap().clone()
    }

    pub fn get(&self, id: i64) -> Option<Subscription> {
        self.rows.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    pub fn fail_scans(&self, fail: bool) {
        *self.fail_scans.lock().unwrap() = fail;
    }

    pub fn fail_updates_for(&self, id: i64) {
        self.failing_updates.lock().unwrap().insert(id);
    }

    fn insert_rows(&self, rows: &[NewSubscription]) -> Vec<i64> {
        let mut stored = self.rows.lock().unwrap();
        let mut next_id = self.next_id.lock().unwrap();

        rows.iter()
            .map(|row| {
                *next_id += 1;
                stored.push(Subscription {
                    id: *next_id,
                    user_id: row.user_id,
                    asset_id: row.asset_id.clone(),
                    display_symbol: row.display_symbol.clone(),
                    interval_days: row.interval_days,
                    notify_time: row.notify_time,
                    last_check_date: row.last_check_date,
                    last_price: row.last_price,
                    created_at: Utc::now(),
                });
                *next_id
            })
            .collect()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert_many(&self, subscriptions: &[NewSubscription]) -> Result<Vec<i64>> {
        Ok(self.insert_rows(subscriptions))
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>> {
        if *self.fail_scans.lock().unwrap() {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.snapshot())
    }

    async fn delete_for_user(&self, user_id: i64, subscription_id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| !(s.id == subscription_id && s.user_id == user_id));
        Ok(rows.len() < before)
    }

    async fn update_baseline(
        &self,
        subscription_id: i64,
        checked_on: NaiveDate,
        price: f64,
    ) -> Result<bool> {
        if self.failing_updates.lock().unwrap().contains(&subscription_id) {
            return Err(anyhow!("write failed for #{}", subscription_id));
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|s| s.id == subscription_id) {
            Some(row) => {
                row.last_check_date = checked_on;
                row.last_price = price;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Price service answering from a fixed table, recording every batch request
#[derive(Default)]
pub struct ScriptedPriceService {
    prices: Mutex<HashMap<String, f64>>,
    failure: Mutex<Option<PriceSourceError>>,
    failing_batches: Mutex<Vec<String>>,
    pub batch_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPriceService {
    pub fn with_prices(prices: &[(&str, f64)]) -> Self {
        let service = Self::default();
        *service.prices.lock().unwrap() = prices
            .iter()
            .map(|(id, price)| (id.to_string(), *price))
            .collect();
        service
    }

    /// Every request fails with the given error
    pub fn fail_with(&self, error: PriceSourceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Batch requests containing this id time out
    pub fn fail_batches_containing(&self, asset_id: &str) {
        self.failing_batches.lock().unwrap().push(asset_id.to_string());
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceService for ScriptedPriceService {
    async fn get_price(&self, asset_id: &str) -> Result<f64, PriceSourceError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }

        self.prices
            .lock()
            .unwrap()
            .get(asset_id)
            .copied()
            .ok_or_else(|| PriceSourceError::NotFound(asset_id.to_string()))
    }

    async fn get_prices(
        &self,
        asset_ids: &[String],
    ) -> Result<HashMap<String, f64>, PriceSourceError> {
        self.batch_calls.lock().unwrap().push(asset_ids.to_vec());

        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        if self
            .failing_batches
            .lock()
            .unwrap()
            .iter()
            .any(|id| asset_ids.contains(id))
        {
            return Err(PriceSourceError::Timeout);
        }

        let prices = self.prices.lock().unwrap();
        Ok(asset_ids
            .iter()
            .filter_map(|id| prices.get(id).map(|price| (id.clone(), *price)))
            .collect())
    }
}

/// Name lookup answering from a fixed table keyed by lowercase query
#[derive(Default)]
pub struct StaticSearchService {
    matches: HashMap<String, AssetMatch>,
    failing_queries: HashSet<String>,
}

impl StaticSearchService {
    pub fn new(entries: &[(&str, &str, &str)]) -> Self {
        let matches = entries
            .iter()
            .map(|(query, id, symbol)| {
                (
                    query.to_string(),
                    AssetMatch {
                        id: id.to_string(),
                        symbol: symbol.to_string(),
                        name: id.to_string(),
                    },
                )
            })
            .collect();

        Self {
            matches,
            failing_queries: HashSet::new(),
        }
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing_queries.insert(query.to_string());
        self
    }
}

#[async_trait]
impl AssetSearchService for StaticSearchService {
    async fn search(&self, query: &str) -> Result<Option<AssetMatch>, PriceSourceError> {
        if self.failing_queries.contains(query) {
            return Err(PriceSourceError::Timeout);
        }
        Ok(self.matches.get(query).cloned())
    }
}

/// Transport that records messages and can refuse chosen users
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(i64, String)>>,
    blocked_users: Mutex<HashSet<i64>>,
}

impl RecordingTransport {
    pub fn block(&self, user_id: i64) {
        self.blocked_users.lock().unwrap().insert(user_id);
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send_report(&self, user_id: i64, html_text: &str) -> Result<()> {
        if self.blocked_users.lock().unwrap().contains(&user_id) {
            return Err(anyhow!("Forbidden: bot was blocked by the user"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((user_id, html_text.to_string()));
        Ok(())
    }
}

/// Answers the first HTTP request with the given status and JSON body; returns the base URL
pub async fn serve_once(status: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    url
}

/// Accepts connections but never answers
pub async fn serve_silently() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
    });

    url
}
