use crate::entity::Subscription;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

pub const ADD_BUTTON: &str = "➕ Add";
pub const LIST_BUTTON: &str = "📋 My subscriptions";
pub const DELETE_BUTTON: &str = "🗑 Delete";

const DELETE_CALLBACK_PREFIX: &str = "del_";

pub fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(ADD_BUTTON),
        KeyboardButton::new(LIST_BUTTON),
        KeyboardButton::new(DELETE_BUTTON),
    ]])
    .resize_keyboard()
}

pub fn delete_keyboard(subscriptions: &[Subscription]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(subscriptions.iter().map(|sub| {
        vec![InlineKeyboardButton::callback(
            format!("❌ {} ({})", sub.display_symbol, sub.format_notify_time()),
            delete_callback_data(sub.id),
        )]
    }))
}

pub fn delete_callback_data(subscription_id: i64) -> String {
    format!("{}{}", DELETE_CALLBACK_PREFIX, subscription_id)
}

pub fn parse_delete_callback(data: &str) -> Option<i64> {
    data.strip_prefix(DELETE_CALLBACK_PREFIX)?.parse().ok()
}
