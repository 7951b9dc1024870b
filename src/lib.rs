pub mod coingecko;
pub mod commands;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod router;
pub mod services;
pub mod utils;
pub mod view;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use log::info;
use sqlx::PgPool;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use di::ServiceContainer;
pub use entity::State;
pub use router::{Router, TelegramRouter};
pub use services::alert_service::{AlertScheduler, AlertService};
pub use services::batch_notifier::BatchNotifier;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wires the dispatcher router and the background alert service around one container
pub fn create_application(
    bot: Bot,
    db_pool: Arc<PgPool>,
) -> Result<(
    TelegramRouter,
    Bot,
    Arc<ServiceContainer>,
    Arc<InMemStorage<State>>,
    AlertService,
)> {
    let container = Arc::new(ServiceContainer::new(db_pool, bot.clone())?);
    info!(
        "Using price API at {} (quotes in {})",
        container.coingecko_config().api_url,
        container.coingecko_config().vs_currency
    );

    let router = TelegramRouter::new(container.clone());
    let storage = InMemStorage::<State>::new();

    let notifier = Arc::new(BatchNotifier::new(
        container.repository(),
        container.price_service(),
        container.transport(),
    ));
    let scheduler = AlertScheduler::new(container.repository(), notifier);
    let alert_service = AlertService::new(scheduler, container.clock(), container.alert_config());

    Ok((router, bot, container, storage, alert_service))
}
