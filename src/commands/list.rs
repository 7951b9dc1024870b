use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::subscription_presenter::SubscriptionPresenter;

pub struct ListCommand;

impl CommandHandler for ListCommand {
    fn command_name() -> &'static str {
        "list"
    }

    fn description() -> &'static str {
        "show your subscriptions"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("List command received from user {}", user_id);

        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        subscription_presenter(bot, msg.chat.id, &services)
            .show_subscriptions(user_id)
            .await
    }
}
