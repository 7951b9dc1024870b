use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::subscription_presenter::{AssetStep, SubscriptionPresenter};

pub struct AddCommand;

impl CommandHandler for AddCommand {
    fn command_name() -> &'static str {
        "add"
    }

    fn description() -> &'static str {
        "subscribe to price reports"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow::anyhow!("Dialogue context not provided"))?;
        info!("Add command initiated by user {}", user_id);

        dialogue.update(State::AwaitingAssets).await?;
        subscription_presenter(bot, msg.chat.id, &services)
            .start_add_flow()
            .await
    }
}

pub async fn receive_assets(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the coin list as text:")
            .await?;
        return Ok(());
    };

    let presenter = subscription_presenter(bot, msg.chat.id, &services);
    match presenter.submit_assets(text).await? {
        AssetStep::Resolved(assets) => {
            dialogue.update(State::AwaitingInterval { assets }).await?;
        }
        AssetStep::NotFound => {
            dialogue.update(State::Start).await?;
        }
        // stay in AwaitingAssets
        AssetStep::RetryLater => {}
    }

    Ok(())
}

pub async fn receive_interval(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingInterval { assets } = state else {
        return Ok(());
    };

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the number of days:")
            .await?;
        return Ok(());
    };

    let presenter = subscription_presenter(bot, msg.chat.id, &services);
    if let Some(interval_days) = presenter.submit_interval(text).await? {
        dialogue
            .update(State::AwaitingTime {
                assets,
                interval_days,
            })
            .await?;
    }

    Ok(())
}

pub async fn receive_time(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingTime {
        assets,
        interval_days,
    } = state
    else {
        return Ok(());
    };

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please enter the time as HH:MM:")
            .await?;
        return Ok(());
    };

    let user_id = msg.chat.id.0;
    let presenter = subscription_presenter(bot, msg.chat.id, &services);
    if presenter
        .submit_time(user_id, assets, interval_days, text)
        .await?
    {
        dialogue.update(State::Start).await?;
    }

    Ok(())
}
