use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::presenter::subscription_presenter::SubscriptionPresenter;

pub struct CancelCommand;

impl CommandHandler for CancelCommand {
    fn command_name() -> &'static str {
        "cancel"
    }

    fn description() -> &'static str {
        "abort adding a subscription"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        subscription_presenter(bot, msg.chat.id, &services)
            .cancel()
            .await
    }
}
