use crate::interactor::subscription_repository::SubscriptionRepository;
use crate::services::alert_config::{AlertConfig, Clock};
use crate::services::batch_notifier::{BatchNotifier, TickReport};
use crate::services::due_selector::select_due;
use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::select;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// One evaluation of all subscriptions against the current time
#[derive(Clone)]
pub struct AlertScheduler {
    repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    notifier: Arc<BatchNotifier>,
}

impl AlertScheduler {
    pub fn new(
        repository: Arc<dyn SubscriptionRepository + Send + Sync>,
        notifier: Arc<BatchNotifier>,
    ) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Reads the whole store, selects what is due and sends the reports
    pub async fn run_tick(&self, now: NaiveDateTime) -> Result<TickReport> {
        let subscriptions = self.repository.list_all().await?;
        let total = subscriptions.len();

        let groups = select_due(subscriptions, now);
        if groups.is_empty() {
            debug!(
                "Tick {}: nothing due among {} subscriptions",
                now.format("%Y-%m-%d %H:%M"),
                total
            );
            return Ok(TickReport::default());
        }

        let report = self.notifier.notify_all(groups, now.date()).await;
        info!(
            "Tick {}: {} subscriptions due for {} users, {} reports sent ({} lines), {} skipped, {} undelivered",
            now.format("%Y-%m-%d %H:%M"),
            report.subscriptions_due,
            report.users_due,
            report.messages_sent,
            report.lines_sent,
            report.groups_skipped,
            report.delivery_failures
        );

        Ok(report)
    }

    /// Runs a tick on its own task so neither an error nor a panic reaches the loop
    pub async fn run_isolated_tick(&self, now: NaiveDateTime) -> Option<TickReport> {
        let scheduler = self.clone();

        match tokio::spawn(async move { scheduler.run_tick(now).await }).await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(e)) => {
                error!("Error processing subscriptions: {}", e);
                None
            }
            Err(e) => {
                error!("Subscription tick aborted: {}", e);
                None
            }
        }
    }
}

/// Background service that ticks the scheduler at a fixed cadence
pub struct AlertService {
    scheduler: AlertScheduler,
    clock: Arc<dyn Clock>,
    config: AlertConfig,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AlertService {
    pub fn new(scheduler: AlertScheduler, clock: Arc<dyn Clock>, config: AlertConfig) -> Self {
        Self {
            scheduler,
            clock,
            config,
            stop_tx: None,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    // Start the background loop; the first tick fires immediately
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Alert service is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let scheduler = self.scheduler.clone();
        let clock = self.clock.clone();
        let period = self.config.tick_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_run = Instant::now();

            loop {
                select! {
                    _ = ticker.tick() => {
                        debug!("Running subscription check (last run: {:.2?} ago)", last_run.elapsed());

                        scheduler.run_isolated_tick(clock.now()).await;

                        let took = last_run.elapsed();
                        last_run = Instant::now();
                        if took > period * 2 {
                            warn!("Subscription check loop fell behind by {:.2?}", took - period);
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping alert service");
                        break;
                    }
                }
            }
        });

        self.handle = Some(handle);
        info!(
            "Alert service started, checking every {:?} ({})",
            period,
            self.config.timezone_label()
        );
        Ok(())
    }

    // Stop the loop and wait for an in-flight tick to finish
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Alert service stop signal sent");
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Alert service task ended abnormally: {}", e);
            }
        }
    }
}
