use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use crate::commands::ui::parse_delete_callback;
use crate::di::ServiceContainer;
use crate::presenter::subscription_presenter::{SubscriptionPresenter, SubscriptionPresenterImpl};
use crate::view::subscription_view::TelegramSubscriptionView;

// Main callback handler function
pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(callback_data) = q.data.clone() else {
        return Ok(());
    };

    let Some(message) = q.regular_message() else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    // Subscriptions belong to the chat the reports go to
    let chat_id = message.chat.id;
    let user_id = chat_id.0;

    info!("Received callback: {} from user {}", callback_data, user_id);

    let Some(subscription_id) = parse_delete_callback(&callback_data) else {
        warn!("Unknown callback data: {}", callback_data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let view = Arc::new(TelegramSubscriptionView::editing(
        bot.clone(),
        chat_id,
        message.id,
    ));
    let presenter = SubscriptionPresenterImpl::new(
        services.subscription_interactor(),
        view,
        services.alert_config().timezone_label(),
    );

    let answer = match presenter.delete_subscription(user_id, subscription_id).await? {
        true => "Deleted!",
        false => "Not found",
    };

    if let Err(err) = bot
        .answer_callback_query(q.id.clone())
        .text(answer)
        .await
    {
        info!("Failed to answer callback query: {}", err);
    }

    Ok(())
}
