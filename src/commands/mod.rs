use anyhow::Result;
use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage},
    prelude::*,
};

use crate::di::ServiceContainer;
use crate::entity::State;
use crate::interactor::subscription_interactor::SubscriptionInteractorImpl;
use crate::presenter::subscription_presenter::SubscriptionPresenterImpl;
use crate::view::subscription_view::TelegramSubscriptionView;

pub mod callback;
pub mod cancel;
pub mod delete;
pub mod help;
pub mod list;
pub mod start;
pub mod subscribe;
pub mod ui;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command
    async fn execute(
        bot: Bot,
        msg: Message,
        user_id: i64,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            start::StartCommand::command_name(),
            start::StartCommand::description(),
        ),
        (
            subscribe::AddCommand::command_name(),
            subscribe::AddCommand::description(),
        ),
        (
            list::ListCommand::command_name(),
            list::ListCommand::description(),
        ),
        (
            delete::DeleteCommand::command_name(),
            delete::DeleteCommand::description(),
        ),
        (
            cancel::CancelCommand::command_name(),
            cancel::CancelCommand::description(),
        ),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
    ]
}

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "start the bot and show the main menu")]
    Start,
    #[command(description = "subscribe to price reports")]
    Add,
    #[command(description = "show your subscriptions")]
    List,
    #[command(description = "remove a subscription")]
    Delete,
    #[command(description = "abort adding a subscription")]
    Cancel,
    #[command(description = "display this help message")]
    Help,
}

/// Presenter wired to a chat, shared by every subscription command
pub(crate) fn subscription_presenter(
    bot: Bot,
    chat_id: ChatId,
    services: &ServiceContainer,
) -> SubscriptionPresenterImpl<SubscriptionInteractorImpl, TelegramSubscriptionView> {
    let view = Arc::new(TelegramSubscriptionView::new(bot, chat_id));
    SubscriptionPresenterImpl::new(
        services.subscription_interactor(),
        view,
        services.alert_config().timezone_label(),
    )
}
