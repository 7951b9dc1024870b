use crate::coingecko::{PriceService, PriceSourceError};
use crate::entity::{PriceChange, PriceReport, ReportLine, Subscription};
use crate::interactor::subscription_repository::SubscriptionRepository;
use crate::services::due_selector::{due_count, DueGroups};
use crate::view::report_view::{format_report, MessageTransport};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::Arc;

/// What happened to one user's due subscriptions in a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    /// One consolidated message with this many lines was sent
    Delivered { lines: usize },
    /// The batch price request failed; nothing was stored or sent
    FetchFailed(PriceSourceError),
    /// No due asset had a quote, so there was nothing to send
    NothingToReport,
    /// Baselines were stored but the transport refused the message
    DeliveryFailed { lines: usize },
}

/// Aggregated outcome of a whole tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub users_due: usize,
    pub subscriptions_due: usize,
    pub messages_sent: usize,
    pub lines_sent: usize,
    pub groups_skipped: usize,
    pub delivery_failures: usize,
}

impl TickReport {
    fn record(&mut self, outcome: &GroupOutcome) {
        match outcome {
            GroupOutcome::Delivered { lines } => {
                self.messages_sent += 1;
                self.lines_sent += lines;
            }
            GroupOutcome::FetchFailed(_) | GroupOutcome::NothingToReport => {
                self.groups_skipped += 1;
            }
            GroupOutcome::DeliveryFailed { .. } => self.delivery_failures += 1,
        }
    }
}

/// Turns due subscriptions into one report per user and moves their baselines forward
pub struct BatchNotifier {
    repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    price_service: Arc<dyn PriceService + Send + Sync>,
    transport: Arc<dyn MessageTransport + Send + Sync>,
}

impl BatchNotifier {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository + Send + Sync>,
        price_service: Arc<dyn PriceService + Send + Sync>,
        transport: Arc<dyn MessageTransport + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            price_service,
            transport,
        }
    }

    /// Processes every user group independently; one user's failure never affects another
    pub async fn notify_all(&self, groups: DueGroups, today: NaiveDate) -> TickReport {
        let mut report = TickReport {
            users_due: groups.len(),
            subscriptions_due: due_count(&groups),
            ..TickReport::default()
        };

        for (user_id, due) in groups {
            let outcome = self.notify_user(user_id, &due, today).await;
            report.record(&outcome);
        }

        report
    }

    /// Fetches all prices of the group in one request and sends a single report
    pub async fn notify_user(
        &self,
        user_id: i64,
        due: &[Subscription],
        today: NaiveDate,
    ) -> GroupOutcome {
        let asset_ids = unique_asset_ids(due);
        debug!(
            "User {}: {} due subscriptions, {} unique assets",
            user_id,
            due.len(),
            asset_ids.len()
        );

        let prices = match self.price_service.get_prices(&asset_ids).await {
            Ok(prices) => prices,
            Err(e) => {
                error!(
                    "Skipping report for user {}: price batch failed: {}",
                    user_id, e
                );
                return GroupOutcome::FetchFailed(e);
            }
        };

        let mut report = PriceReport::new(user_id, today);

        for subscription in due {
            let Some(&new_price) = prices.get(&subscription.asset_id) else {
                warn!(
                    "No price for {} ({}), subscription #{} stays pending",
                    subscription.display_symbol, subscription.asset_id, subscription.id
                );
                continue;
            };

            let change = PriceChange::between(subscription.last_price, new_price);

            // A line is only reported once its new baseline is stored
            match self
                .repository
                .update_baseline(subscription.id, today, new_price)
                .await
            {
                Ok(true) => report.lines.push(ReportLine {
                    symbol: subscription.display_symbol.clone(),
                    price: new_price,
                    change,
                }),
                Ok(false) => {
                    info!(
                        "Subscription #{} was removed before its report was sent",
                        subscription.id
                    );
                }
                Err(e) => {
                    error!(
                        "Failed to store baseline for subscription #{}: {}",
                        subscription.id, e
                    );
                }
            }
        }

        if report.is_empty() {
            debug!("Nothing to report for user {}", user_id);
            return GroupOutcome::NothingToReport;
        }

        let lines = report.lines.len();
        let text = format_report(&report);

        match self.transport.send_report(user_id, &text).await {
            Ok(()) => {
                info!("Sent report with {} assets to user {}", lines, user_id);
                GroupOutcome::Delivered { lines }
            }
            Err(e) => {
                error!("Failed to deliver report to user {}: {}", user_id, e);
                GroupOutcome::DeliveryFailed { lines }
            }
        }
    }
}

/// Asset ids of the group without duplicates, in first-seen order
pub fn unique_asset_ids(subscriptions: &[Subscription]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(subscriptions.len());
    for subscription in subscriptions {
        if !ids.contains(&subscription.asset_id) {
            ids.push(subscription.asset_id.clone());
        }
    }
    ids
}
