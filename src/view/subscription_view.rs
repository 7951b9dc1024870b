use crate::commands::ui::{delete_keyboard, main_menu_keyboard};
use crate::entity::{AssetResolution, Subscription};
use crate::utils::{format_price, MAX_INTERVAL_DAYS};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveTime;
use teloxide::{
    prelude::*,
    types::{MessageId, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait SubscriptionView: Send + Sync {
    async fn display_welcome(&self) -> Result<()>;
    async fn display_help(&self, timezone_label: &str) -> Result<()>;
    async fn prompt_for_assets(&self) -> Result<()>;
    async fn display_assets_found(&self, resolution: &AssetResolution) -> Result<()>;
    async fn display_assets_not_found(&self) -> Result<()>;
    async fn display_lookup_unavailable(&self) -> Result<()>;
    async fn display_invalid_interval(&self, reason: &str) -> Result<()>;
    async fn prompt_for_time(&self, timezone_label: &str) -> Result<()>;
    async fn display_invalid_time(&self, reason: &str) -> Result<()>;
    async fn display_subscriptions_created(&self, count: usize, notify_time: NaiveTime)
        -> Result<()>;
    async fn display_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()>;
    async fn display_delete_menu(&self, subscriptions: &[Subscription]) -> Result<()>;
    async fn display_dialog_cancelled(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramSubscriptionView {
    bot: Bot,
    chat_id: ChatId,
    // Message to edit in place instead of sending a new one
    message_id: Option<MessageId>,
}

impl TelegramSubscriptionView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self {
            bot,
            chat_id,
            message_id: None,
        }
    }

    pub fn editing(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id: Some(message_id),
        }
    }

    async fn send_with_menu(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(main_menu_keyboard())
            .await?;

        Ok(())
    }

    async fn send_plain(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl SubscriptionView for TelegramSubscriptionView {
    async fn display_welcome(&self) -> Result<()> {
        self.send_with_menu(
            "<b>Hello!</b> I keep an eye on crypto prices for you.\n\n\
             Add coins, pick how often and at what time you want a report, \
             and I will send you the price change since the last one.\n\
             Use the menu below."
                .to_string(),
        )
        .await
    }

    async fn display_help(&self, timezone_label: &str) -> Result<()> {
        self.send_with_menu(format!(
            "Available commands:\n\
             /add - subscribe to price reports\n\
             /list - show your subscriptions\n\
             /delete - remove a subscription\n\
             /cancel - abort adding a subscription\n\
             /help - show this message\n\n\
             Report times are in {}.",
            html::escape(timezone_label)
        ))
        .await
    }

    async fn prompt_for_assets(&self) -> Result<()> {
        self.send_plain(
            "Enter coins separated by commas (tickers or names work):\n\
             For example: <code>BTC, ETH, XRP, TON</code>"
                .to_string(),
        )
        .await
    }

    async fn display_assets_found(&self, resolution: &AssetResolution) -> Result<()> {
        let mut text = format!("Found: <b>{}</b>\n", html::escape(&resolution.symbols()));

        if !resolution.unresolved.is_empty() {
            text.push_str(&format!(
                "Not found: {}\n",
                html::escape(&resolution.unresolved.join(", "))
            ));
        }

        text.push_str(&format!(
            "\nHow often should I send the report? Enter the number of DAYS (1-{}), for example 1:",
            MAX_INTERVAL_DAYS
        ));

        self.send_plain(text).await
    }

    async fn display_assets_not_found(&self) -> Result<()> {
        self.send_with_menu(
            "Could not find the coins you entered. Try full names or the main tickers."
                .to_string(),
        )
        .await
    }

    async fn display_lookup_unavailable(&self) -> Result<()> {
        self.send_plain(
            "⚠️ The price service is not responding right now. Please send the coin list again:"
                .to_string(),
        )
        .await
    }

    async fn display_invalid_interval(&self, reason: &str) -> Result<()> {
        self.send_plain(format!(
            "❌ {}\nPlease enter a whole number of days, for example 1:",
            html::escape(reason)
        ))
        .await
    }

    async fn prompt_for_time(&self, timezone_label: &str) -> Result<()> {
        self.send_plain(format!(
            "At what time should I send it? ({})\nFormat HH:MM, for example 09:00:",
            html::escape(timezone_label)
        ))
        .await
    }

    async fn display_invalid_time(&self, reason: &str) -> Result<()> {
        self.send_plain(format!(
            "❌ {}\nPlease enter the time as HH:MM, for example 09:00:",
            html::escape(reason)
        ))
        .await
    }

    async fn display_subscriptions_created(
        &self,
        count: usize,
        notify_time: NaiveTime,
    ) -> Result<()> {
        self.send_with_menu(format!(
            "✅ Coins added: {}. Expect your report at {}.",
            count,
            notify_time.format("%H:%M")
        ))
        .await
    }

    async fn display_subscriptions(&self, subscriptions: &[Subscription]) -> Result<()> {
        if subscriptions.is_empty() {
            return self.send_with_menu("Your list is empty.".to_string()).await;
        }

        let mut text = "<b>Your subscriptions:</b>\n\n".to_string();
        for sub in subscriptions {
            text.push_str(&format!(
                "🔹 <b>{}</b> | every {} d. at {} | Base: ${}\n",
                html::escape(&sub.display_symbol),
                sub.interval_days,
                sub.format_notify_time(),
                format_price(sub.last_price)
            ));
        }

        self.send_with_menu(text).await
    }

    async fn display_delete_menu(&self, subscriptions: &[Subscription]) -> Result<()> {
        let text = if subscriptions.is_empty() {
            "Nothing to delete."
        } else {
            "Tap the subscription you want to delete:"
        };

        match self.message_id {
            Some(message_id) if subscriptions.is_empty() => {
                self.bot
                    .edit_message_text(self.chat_id, message_id, text)
                    .await?;
            }
            Some(message_id) => {
                self.bot
                    .edit_message_text(self.chat_id, message_id, text)
                    .reply_markup(delete_keyboard(subscriptions))
                    .await?;
            }
            None if subscriptions.is_empty() => {
                self.send_with_menu(text.to_string()).await?;
            }
            None => {
                self.bot
                    .send_message(self.chat_id, text)
                    .reply_markup(delete_keyboard(subscriptions))
                    .await?;
            }
        }

        Ok(())
    }

    async fn display_dialog_cancelled(&self) -> Result<()> {
        self.send_with_menu("Cancelled.".to_string()).await
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.send_with_menu(format!("Error: {}", html::escape(&error_message)))
            .await
    }
}
