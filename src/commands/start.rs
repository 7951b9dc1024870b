use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::subscription_presenter::SubscriptionPresenter;

pub struct StartCommand;

impl CommandHandler for StartCommand {
    fn command_name() -> &'static str {
        "start"
    }

    fn description() -> &'static str {
        "start the bot and show the main menu"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Start command received from user {}", user_id);

        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        subscription_presenter(bot, msg.chat.id, &services)
            .show_welcome()
            .await
    }
}
