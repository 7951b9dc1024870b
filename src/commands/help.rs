use super::{subscription_presenter, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::presenter::subscription_presenter::SubscriptionPresenter;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;

pub struct HelpCommand;

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _user_id: i64,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        subscription_presenter(bot, msg.chat.id, &services)
            .show_help()
            .await
    }
}
