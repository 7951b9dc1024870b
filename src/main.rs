//! Crypto price alert bot for Telegram - Main executable
//!
//! Users subscribe to coins through a short dialog and receive a periodic
//! report with the price change since their previous report.
use anyhow::Context;
use coin_alert_bot::Router;
use dotenv::dotenv;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::sync::Arc;
use teloxide::{dptree, Bot};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Coin Alert Telegram Bot v{}", coin_alert_bot::VERSION);

    // Load and validate environment variables
    let bot_token = env::var("TELEGRAM_BOT_TOKEN")
        .context("TELEGRAM_BOT_TOKEN must be set in environment variables")?;

    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment variables")?;

    let bot = Bot::new(bot_token);

    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .context("Failed to create database connection pool")?;
    let db_pool = Arc::new(db_pool);

    // Create a separate connection for migrations
    let db_pool_for_migration = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("Failed to create migration connection pool")?;

    info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!("./migrations")
        .run(&db_pool_for_migration)
        .await
    {
        error!("Failed to run migrations: {}", e);
        return Err(anyhow::Error::from(e));
    }
    info!("Migrations completed successfully");

    db_pool_for_migration.close().await;

    info!("Initializing bot application...");
    let (router, bot, service_container, storage, mut alert_service) =
        coin_alert_bot::create_application(bot, db_pool)
            .context("Failed to initialize application")?;

    info!("Starting price alert background service...");
    if let Err(e) = alert_service.start().await {
        error!("Failed to start price alert service: {}", e);
    } else {
        info!("Price alert service started successfully");
    }

    let handler = router.setup_handlers();

    // Build dispatcher with dependency injections and control-C handling
    let mut dispatcher = teloxide::dispatching::Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![service_container, storage])
        .enable_ctrlc_handler()
        .build();

    info!("Bot is running! Press Ctrl+C to stop.");
    dispatcher.dispatch().await;

    info!("Stopping price alert service...");
    alert_service.stop().await;

    Ok(())
}
