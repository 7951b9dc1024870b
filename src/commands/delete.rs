use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::subscription_presenter::SubscriptionPresenter;

pub struct DeleteCommand;

impl CommandHandler for DeleteCommand {
    fn command_name() -> &'static str {
        "delete"
    }

    fn description() -> &'static str {
        "remove a subscription"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        info!("Delete command received from user {}", user_id);

        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        subscription_presenter(bot, msg.chat.id, &services)
            .show_delete_menu(user_id)
            .await
    }
}
