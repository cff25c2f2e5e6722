//! Operator notifications: every confirmed order is forwarded as a formatted
//! message to the operator chat.
//!
//! Sending is strictly best-effort. A failure (or the notifier not being
//! configured at all) is logged and swallowed; orders are never blocked or
//! retried because of Telegram.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::html;
use tokio::time::timeout;

use crate::config::Settings;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// One line of an order as it appears in the operator message.
#[derive(Debug, Clone)]
pub struct NotificationLine {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Everything the operator needs to see about a fresh order.
#[derive(Debug, Clone)]
pub struct OrderNotification {
    pub order_id: i64,
    pub customer_name: Option<String>,
    pub customer_username: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub items: Vec<NotificationLine>,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Notifier {
    bot: Bot,
    chat_id: ChatId,
}

impl Notifier {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Notifier { bot, chat_id }
    }

    /// Build a notifier from settings. Returns `None` (with a warning) when
    /// the bot token or operator chat id is missing, so callers can keep
    /// taking orders without Telegram.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        match (&settings.bot_token, settings.operator_chat_id) {
            (Some(token), Some(chat_id)) => {
                Some(Notifier::new(Bot::new(token), ChatId(chat_id)))
            }
            _ => {
                warn!("Operator notifications disabled: BOT_TOKEN or TELEGRAM_CHAT_ID not set");
                None
            }
        }
    }

    /// Send the order to the operator chat. Returns whether the message went
    /// out; errors and timeouts are logged, never propagated.
    pub async fn send_order_notification(&self, notification: &OrderNotification) -> bool {
        let text = format_order_message(notification);

        let send = self
            .bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html);

        match timeout(SEND_TIMEOUT, send.send()).await {
            Ok(Ok(_)) => {
                info!(
                    "Order notification sent for order #{}",
                    notification.order_id
                );
                true
            }
            Ok(Err(e)) => {
                error!(
                    "Failed to send order notification for order #{}: {e}",
                    notification.order_id
                );
                false
            }
            Err(_) => {
                error!(
                    "Order notification for order #{} timed out",
                    notification.order_id
                );
                false
            }
        }
    }
}

/// Render the operator message. HTML parse mode, user-supplied text escaped.
pub fn format_order_message(notification: &OrderNotification) -> String {
    let customer = match &notification.customer_name {
        Some(name) => match &notification.customer_username {
            Some(username) => {
                format!("{} (@{})", html::escape(name), html::escape(username))
            }
            None => html::escape(name),
        },
        None => "Anonymous order".to_string(),
    };

    let mut text = format!(
        "🛒 <b>NEW ORDER #{}</b>\n\n👤 <b>Customer:</b> {customer}\n",
        notification.order_id
    );
    if let Some(phone) = &notification.phone {
        text.push_str(&format!("📞 <b>Phone:</b> {}\n", html::escape(phone)));
    }
    if let Some(address) = &notification.address {
        text.push_str(&format!("📍 <b>Address:</b> {}\n", html::escape(address)));
    }
    text.push_str(&format!(
        "🕐 <b>Time:</b> {}\n\n<b>Items:</b>\n",
        notification.created_at.format("%d.%m.%Y %H:%M")
    ));
    for line in &notification.items {
        text.push_str(&format!(
            "• {} x{} — {}₽\n",
            html::escape(&line.name),
            line.quantity,
            format_price(line.price)
        ));
    }
    text.push_str(&format!(
        "\n💰 <b>Total:</b> {}₽",
        format_price(notification.total)
    ));
    text
}

/// Prices render without trailing zeros for whole amounts (150, not 150.00).
pub fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    }
}
