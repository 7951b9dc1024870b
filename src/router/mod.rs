use std::sync::Arc;
use teloxide::{
    dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*,
};

use crate::commands::{
    callback::handle_callback, cancel::CancelCommand, delete::DeleteCommand, help::HelpCommand,
    list::ListCommand, start::StartCommand, subscribe, subscribe::AddCommand, ui, BotCommands,
    CommandHandler, MyDialogue,
};
use crate::di::ServiceContainer;
use crate::entity::State;

// Endpoint closure running a command for the chat that sent the message
macro_rules! command_endpoint {
    ($services:expr, $command:ty) => {{
        let services = $services.clone();
        move |bot: Bot, msg: Message, dialogue: MyDialogue| {
            let services = services.clone();
            async move {
                let user_id = msg.chat.id.0;
                <$command>::execute(bot, msg, user_id, Some(dialogue), services).await
            }
        }
    }};
}

fn is_button(msg: &Message, label: &str) -> bool {
    msg.text().map(str::trim) == Some(label)
}

// Base router trait
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;

        let services = &self.services;

        let command_handler = teloxide::filter_command::<BotCommands, _>()
            .branch(case![BotCommands::Start].endpoint(command_endpoint!(services, StartCommand)))
            .branch(case![BotCommands::Add].endpoint(command_endpoint!(services, AddCommand)))
            .branch(case![BotCommands::List].endpoint(command_endpoint!(services, ListCommand)))
            .branch(
                case![BotCommands::Delete].endpoint(command_endpoint!(services, DeleteCommand)),
            )
            .branch(
                case![BotCommands::Cancel].endpoint(command_endpoint!(services, CancelCommand)),
            )
            .branch(case![BotCommands::Help].endpoint(command_endpoint!(services, HelpCommand)));

        // Menu buttons work from any state and leave an unfinished dialog
        let menu_handler = dptree::entry()
            .branch(
                dptree::filter(|msg: Message| is_button(&msg, ui::ADD_BUTTON))
                    .endpoint(command_endpoint!(services, AddCommand)),
            )
            .branch(
                dptree::filter(|msg: Message| is_button(&msg, ui::LIST_BUTTON))
                    .endpoint(command_endpoint!(services, ListCommand)),
            )
            .branch(
                dptree::filter(|msg: Message| is_button(&msg, ui::DELETE_BUTTON))
                    .endpoint(command_endpoint!(services, DeleteCommand)),
            );

        let services_for_assets = services.clone();
        let services_for_interval = services.clone();
        let services_for_time = services.clone();

        let dialog_handler = dptree::entry()
            .branch(case![State::Start].endpoint(command_endpoint!(services, HelpCommand)))
            .branch(case![State::AwaitingAssets].endpoint(
                move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                    let services = services_for_assets.clone();
                    async move { subscribe::receive_assets(bot, msg, dialogue, services).await }
                },
            ))
            .branch(case![State::AwaitingInterval { assets }].endpoint(
                move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                    let services = services_for_interval.clone();
                    async move {
                        subscribe::receive_interval(bot, msg, state, dialogue, services).await
                    }
                },
            ))
            .branch(
                case![State::AwaitingTime {
                    assets,
                    interval_days
                }]
                .endpoint(
                    move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                        let services = services_for_time.clone();
                        async move {
                            subscribe::receive_time(bot, msg, state, dialogue, services).await
                        }
                    },
                ),
            );

        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(menu_handler)
            .branch(dialog_handler);

        let services_for_callbacks = services.clone();
        let callback_handler =
            Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                let services = services_for_callbacks.clone();
                async move { handle_callback(bot, q, services).await }
            });

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
            .branch(callback_handler)
    }
}
