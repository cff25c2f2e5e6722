//! Checkout: cart snapshot, phone collection and order persistence.

use anyhow::Result;
use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::KeyboardRemove;
use tracing::error;

use crate::db;
use crate::models::{NewOrder, NewOrderItem};
use crate::notifier::{format_price, NotificationLine, Notifier, OrderNotification};
use crate::phone::normalize_phone;

use super::keyboards::{
    cart_review_keyboard, choose_restaurant_keyboard, manual_phone_keyboard, menu_keyboard,
    phone_request_keyboard, CANCEL_ORDER_BTN, MANUAL_PHONE_BTN,
};
use super::state::{OrderDialogue, OrderState, PendingOrder, SelectedRestaurant};
use super::state::{render_cart_summary, snapshot_cart};

/// Take the cart snapshot and show the summary. An empty (or entirely
/// unresolvable) cart never leaves the browsing state.
pub async fn start_checkout(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    restaurant: SelectedRestaurant,
    cart: Vec<String>,
) -> Result<()> {
    if cart.is_empty() {
        bot.send_message(msg.chat.id, "Your cart is empty.").await?;
        return Ok(());
    }

    let products = db::list_products_by_restaurant(pool, restaurant.id).await?;
    let pending = snapshot_cart(&products, &cart);
    if pending.is_empty() {
        bot.send_message(msg.chat.id, "Your cart is empty.").await?;
        return Ok(());
    }

    show_cart_summary(bot, msg, dialogue, restaurant, pending).await
}

pub async fn show_cart_summary(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    restaurant: SelectedRestaurant,
    pending: PendingOrder,
) -> Result<()> {
    let summary = render_cart_summary(&restaurant, &pending);
    bot.send_message(msg.chat.id, summary)
        .reply_markup(cart_review_keyboard())
        .await?;
    dialogue
        .update(OrderState::CartReview {
            restaurant,
            pending,
        })
        .await?;
    Ok(())
}

/// Confirm button pressed: make sure the user exists, then always collect a
/// phone number before the order is persisted.
pub async fn confirm_order(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    restaurant: SelectedRestaurant,
    pending: PendingOrder,
) -> Result<()> {
    let telegram_id = sender_telegram_id(msg);
    let name = msg.from.as_ref().map(|u| u.full_name());
    db::get_or_create_user(pool, &telegram_id, name.as_deref()).await?;

    bot.send_message(
        msg.chat.id,
        format!(
            "📱 To confirm your {}₽ order we need your phone number.\n\
             We'll call you on it when the order is ready.\n\n\
             Tap \"{}\" or type it in.",
            format_price(pending.total),
            super::keyboards::SHARE_PHONE_BTN
        ),
    )
    .reply_markup(phone_request_keyboard())
    .await?;

    dialogue
        .update(OrderState::AwaitingPhone {
            restaurant,
            pending,
        })
        .await?;
    Ok(())
}

/// Everything the user sends while we wait for a phone number comes here:
/// a shared contact, the manual-entry button, cancel, or a typed number.
#[allow(clippy::too_many_arguments)]
pub async fn handle_phone_input(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    notifier: Option<Notifier>,
    restaurant: SelectedRestaurant,
    pending: PendingOrder,
) -> Result<()> {
    if let Some(contact) = msg.contact() {
        // Only accept the sender's own contact card.
        if contact.user_id != msg.from.as_ref().map(|u| u.id) {
            bot.send_message(msg.chat.id, "❌ Please share your own phone number.")
                .reply_markup(KeyboardRemove::new())
                .await?;
            return abort_to_restaurant_choice(bot, msg, dialogue).await;
        }
        match normalize_phone(&contact.phone_number) {
            Ok(phone) => {
                return place_order(bot, msg, dialogue, pool, notifier, restaurant, pending, phone)
                    .await;
            }
            Err(_) => {
                bot.send_message(
                    msg.chat.id,
                    "❌ That number doesn't look right. Please type it in.",
                )
                .reply_markup(manual_phone_keyboard())
                .await?;
                return Ok(());
            }
        }
    }

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please share a phone number or cancel the order.")
            .await?;
        return Ok(());
    };

    match text {
        MANUAL_PHONE_BTN => {
            bot.send_message(
                msg.chat.id,
                "📱 Please type your phone number as\n+7XXXXXXXXXX or 8XXXXXXXXXX",
            )
            .reply_markup(manual_phone_keyboard())
            .await?;
            Ok(())
        }
        CANCEL_ORDER_BTN => {
            bot.send_message(msg.chat.id, "❌ Order cancelled.")
                .reply_markup(KeyboardRemove::new())
                .await?;
            abort_to_restaurant_choice(bot, msg, dialogue).await
        }
        _ => match normalize_phone(text) {
            Ok(phone) => {
                place_order(bot, msg, dialogue, pool, notifier, restaurant, pending, phone).await
            }
            Err(_) => {
                bot.send_message(
                    msg.chat.id,
                    "❌ Invalid phone number format.\n\
                     Please use one of:\n\
                     • +7XXXXXXXXXX\n\
                     • 8XXXXXXXXXX\n\
                     • 7XXXXXXXXXX\n\
                     • XXXXXXXXXX",
                )
                .await?;
                Ok(())
            }
        },
    }
}

/// Persist the order (user, order and items in one transaction), clear the
/// cart, confirm to the customer and fire the operator notification.
#[allow(clippy::too_many_arguments)]
async fn place_order(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    notifier: Option<Notifier>,
    restaurant: SelectedRestaurant,
    pending: PendingOrder,
    phone: String,
) -> Result<()> {
    let telegram_id = sender_telegram_id(msg);
    let name = msg.from.as_ref().map(|u| u.full_name());

    let order_result = async {
        let user = db::get_or_create_user(pool, &telegram_id, name.as_deref()).await?;
        db::update_user_phone(pool, &telegram_id, &phone).await?;

        let new_order = NewOrder {
            user_id: Some(user.id),
            restaurant_id: Some(restaurant.id),
            total: pending.total,
            phone: Some(phone.clone()),
            items: pending
                .items
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: item.price,
                    discount_price: item.discount_price,
                })
                .collect(),
        };
        db::create_order(pool, &new_order).await
    }
    .await;

    let order_id = match order_result {
        Ok(order_id) => order_id,
        Err(e) => {
            error!(error = %e, "Failed to persist order");
            bot.send_message(
                msg.chat.id,
                "Something went wrong while placing your order. Please try again.",
            )
            .reply_markup(KeyboardRemove::new())
            .await?;
            return abort_to_restaurant_choice(bot, msg, dialogue).await;
        }
    };

    bot.send_message(
        msg.chat.id,
        format!(
            "✅ Order #{order_id} confirmed and will be ready in 15 minutes!\n\
             💰 Order total: {}₽\n\
             📞 We'll call you at {phone} when it's ready.\n\
             Thank you!",
            format_price(pending.total)
        ),
    )
    .reply_markup(KeyboardRemove::new())
    .await?;

    // Same cafe stays selected for the next order; the cart starts fresh.
    dialogue
        .update(OrderState::Browsing {
            restaurant: restaurant.clone(),
            cart: Vec::new(),
        })
        .await?;
    bot.send_message(msg.chat.id, "Anything else?")
        .reply_markup(menu_keyboard())
        .await?;

    if let Some(notifier) = notifier {
        let notification = OrderNotification {
            order_id,
            customer_name: name,
            customer_username: msg.from.as_ref().and_then(|u| u.username.clone()),
            phone: Some(phone),
            address: Some(restaurant.address.clone()),
            items: pending
                .items
                .iter()
                .map(|item| NotificationLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.effective_price(),
                })
                .collect(),
            total: pending.total,
            created_at: chrono::Utc::now(),
        };
        // Fire and forget; failures are logged inside the notifier.
        tokio::spawn(async move {
            notifier.send_order_notification(&notification).await;
        });
    }

    Ok(())
}

async fn abort_to_restaurant_choice(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
) -> Result<()> {
    dialogue.update(OrderState::Start).await?;
    bot.send_message(msg.chat.id, "To continue, choose a cafe:")
        .reply_markup(choose_restaurant_keyboard())
        .await?;
    Ok(())
}

fn sender_telegram_id(msg: &Message) -> String {
    msg.from
        .as_ref()
        .map(|u| u.id.to_string())
        .unwrap_or_else(|| msg.chat.id.to_string())
}
