//! Text-button dispatch for the ordering conversation.
//!
//! Every update lands in [`message_handler`], which walks the dialogue state
//! and the message text through the same decision table the keyboards
//! render. Free text while browsing is a product pick: it goes straight
//! into the cart and is resolved against the menu at checkout time.

use anyhow::Result;
use log::info;
use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::KeyboardRemove;

use crate::db;
use crate::models::{Category, Discount, Product};
use crate::notifier::Notifier;

use super::keyboards::{
    categories_keyboard, choose_restaurant_keyboard, menu_keyboard, products_keyboard,
    restaurant_list_keyboard, BACK_TO_CATEGORIES_BTN, CHECKOUT_BTN, CHOOSE_CAFE_BTN,
    CONFIRM_ORDER_BTN, MAIN_MENU_BTN, MENU_BTN, RESTAURANT_SEPARATOR,
};
use super::order_manager;
use super::state::{OrderDialogue, OrderState, SelectedRestaurant};

const WELCOME_TEXT: &str = "Welcome! 🎉\n\
    Pick a cafe, browse the menu and order something tasty 👇";

/// Entry point wired into the dispatcher for every incoming message.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: OrderDialogue,
    pool: SqlitePool,
    notifier: Option<Notifier>,
) -> Result<()> {
    let state = dialogue.get_or_default().await?;

    // The phone sub-flow consumes everything, including contact messages.
    if let OrderState::AwaitingPhone {
        restaurant,
        pending,
    } = &state
    {
        return order_manager::handle_phone_input(
            &bot,
            &msg,
            &dialogue,
            &pool,
            notifier,
            restaurant.clone(),
            pending.clone(),
        )
        .await;
    }

    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please use the buttons below.")
            .await?;
        return Ok(());
    };
    info!("Message from chat {}: {text}", msg.chat.id);

    match text {
        "/start" => handle_start(&bot, &msg, &dialogue, &pool).await,
        CHOOSE_CAFE_BTN => handle_choose_cafe(&bot, &msg, &pool).await,
        MAIN_MENU_BTN => handle_main_menu(&bot, &msg, &dialogue).await,
        MENU_BTN => handle_show_menu(&bot, &msg, &dialogue, &pool, state).await,
        BACK_TO_CATEGORIES_BTN => {
            handle_back_to_categories(&bot, &msg, &dialogue, &pool, state).await
        }
        CHECKOUT_BTN => handle_checkout(&bot, &msg, &dialogue, &pool, state).await,
        CONFIRM_ORDER_BTN => handle_confirm(&bot, &msg, &dialogue, &pool, state).await,
        _ if text.contains(RESTAURANT_SEPARATOR) => {
            handle_select_restaurant(&bot, &msg, &dialogue, &pool, text).await
        }
        _ => handle_free_text(&bot, &msg, &dialogue, &pool, state, text).await,
    }
}

async fn handle_start(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
) -> Result<()> {
    dialogue.update(OrderState::Start).await?;

    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .reply_markup(KeyboardRemove::new())
        .await?;

    let discounts = db::list_active_discounts(pool).await?;
    if let Some(text) = render_discounts(&discounts) {
        bot.send_message(msg.chat.id, text).await?;
    }

    bot.send_message(msg.chat.id, "To get started, choose a cafe:")
        .reply_markup(choose_restaurant_keyboard())
        .await?;
    Ok(())
}

async fn handle_choose_cafe(bot: &Bot, msg: &Message, pool: &SqlitePool) -> Result<()> {
    let restaurants = db::list_restaurants(pool).await?;
    if restaurants.is_empty() {
        bot.send_message(msg.chat.id, "No cafes are available yet. Check back later!")
            .await?;
        return Ok(());
    }
    bot.send_message(msg.chat.id, "Please pick a cafe:")
        .reply_markup(restaurant_list_keyboard(&restaurants))
        .await?;
    Ok(())
}

async fn handle_select_restaurant(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    text: &str,
) -> Result<()> {
    let Some((name, address)) = text.split_once('|') else {
        return Ok(());
    };
    let (name, address) = (name.trim(), address.trim());

    let restaurants = db::list_restaurants(pool).await?;
    let Some(restaurant) = restaurants
        .iter()
        .find(|r| r.name == name && r.address == address)
    else {
        bot.send_message(msg.chat.id, "Cafe not found. Please pick one from the list.")
            .reply_markup(choose_restaurant_keyboard())
            .await?;
        return Ok(());
    };

    dialogue
        .update(OrderState::Browsing {
            restaurant: SelectedRestaurant {
                id: restaurant.id,
                name: restaurant.name.clone(),
                address: restaurant.address.clone(),
            },
            cart: Vec::new(),
        })
        .await?;

    bot.send_message(
        msg.chat.id,
        format!(
            "You picked: {}\nAddress: {}",
            restaurant.name, restaurant.address
        ),
    )
    .reply_markup(menu_keyboard())
    .await?;

    let discounts = db::list_active_discounts_by_restaurant(pool, restaurant.id).await?;
    if let Some(text) = render_discounts(&discounts) {
        bot.send_message(msg.chat.id, text).await?;
    }
    Ok(())
}

async fn handle_main_menu(bot: &Bot, msg: &Message, dialogue: &OrderDialogue) -> Result<()> {
    dialogue.update(OrderState::Start).await?;
    bot.send_message(msg.chat.id, "To continue, choose a cafe:")
        .reply_markup(choose_restaurant_keyboard())
        .await?;
    Ok(())
}

async fn handle_show_menu(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    state: OrderState,
) -> Result<()> {
    let (restaurant, cart) = match state {
        OrderState::Browsing { restaurant, cart } => (restaurant, cart),
        // Menu from the cart summary keeps the cart; rebuild the name
        // multiset from the snapshot.
        OrderState::CartReview {
            restaurant,
            pending,
        } => {
            let cart = pending
                .items
                .iter()
                .flat_map(|item| {
                    std::iter::repeat(item.name.clone()).take(item.quantity as usize)
                })
                .collect();
            (restaurant, cart)
        }
        _ => return prompt_restaurant_choice(bot, msg).await,
    };
    dialogue
        .update(OrderState::Browsing {
            restaurant: restaurant.clone(),
            cart,
        })
        .await?;
    show_categories(bot, msg, pool, restaurant.id).await
}

/// From the cart summary this abandons the checkout and empties the cart,
/// as the original flow does; from anywhere else it is plain navigation.
async fn handle_back_to_categories(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    state: OrderState,
) -> Result<()> {
    match state {
        OrderState::Browsing { restaurant, .. } => {
            show_categories(bot, msg, pool, restaurant.id).await
        }
        OrderState::CartReview { restaurant, .. } => {
            dialogue
                .update(OrderState::Browsing {
                    restaurant: restaurant.clone(),
                    cart: Vec::new(),
                })
                .await?;
            bot.send_message(msg.chat.id, "Cart cleared. Pick your items again:")
                .await?;
            show_categories(bot, msg, pool, restaurant.id).await
        }
        _ => prompt_restaurant_choice(bot, msg).await,
    }
}

async fn handle_checkout(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    state: OrderState,
) -> Result<()> {
    match state {
        OrderState::Browsing { restaurant, cart } => {
            order_manager::start_checkout(bot, msg, dialogue, pool, restaurant, cart).await
        }
        OrderState::CartReview {
            restaurant,
            pending,
        } => {
            // Checkout pressed twice: just re-show the summary.
            order_manager::show_cart_summary(bot, msg, dialogue, restaurant, pending).await
        }
        _ => prompt_restaurant_choice(bot, msg).await,
    }
}

async fn handle_confirm(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    state: OrderState,
) -> Result<()> {
    match state {
        OrderState::CartReview {
            restaurant,
            pending,
        } => order_manager::confirm_order(bot, msg, dialogue, pool, restaurant, pending).await,
        _ => prompt_restaurant_choice(bot, msg).await,
    }
}

async fn handle_free_text(
    bot: &Bot,
    msg: &Message,
    dialogue: &OrderDialogue,
    pool: &SqlitePool,
    state: OrderState,
    text: &str,
) -> Result<()> {
    let (restaurant, mut cart) = match state {
        OrderState::Browsing { restaurant, cart } => (restaurant, cart),
        _ => return prompt_restaurant_choice(bot, msg).await,
    };

    let products = db::list_products_by_restaurant(pool, restaurant.id).await?;
    let categories = db::list_categories(pool).await?;

    // A category name shows its products; anything else goes into the cart.
    if let Some(category) = categories.iter().find(|c| c.name == text) {
        let in_category: Vec<&Product> = products
            .iter()
            .filter(|p| p.category_id == Some(category.id))
            .collect();
        if !in_category.is_empty() {
            bot.send_message(msg.chat.id, "Pick a product:")
                .reply_markup(products_keyboard(&in_category))
                .await?;
            return Ok(());
        }
    }

    cart.push(text.to_string());
    dialogue
        .update(OrderState::Browsing { restaurant, cart })
        .await?;
    bot.send_message(msg.chat.id, format!("\"{text}\" added to your order!"))
        .await?;
    Ok(())
}

async fn prompt_restaurant_choice(bot: &Bot, msg: &Message) -> Result<()> {
    bot.send_message(msg.chat.id, "First, choose a cafe:")
        .reply_markup(choose_restaurant_keyboard())
        .await?;
    Ok(())
}

async fn show_categories(
    bot: &Bot,
    msg: &Message,
    pool: &SqlitePool,
    restaurant_id: i64,
) -> Result<()> {
    let products = db::list_products_by_restaurant(pool, restaurant_id).await?;
    let categories = db::list_categories(pool).await?;
    let names = category_names(&categories, &products);

    if names.is_empty() {
        bot.send_message(msg.chat.id, "This cafe has nothing on the menu yet.")
            .await?;
        return Ok(());
    }
    bot.send_message(msg.chat.id, "Pick a category:")
        .reply_markup(categories_keyboard(&names))
        .await?;
    Ok(())
}

/// Names of the categories that actually contain available products.
fn category_names(categories: &[Category], products: &[Product]) -> Vec<String> {
    categories
        .iter()
        .filter(|c| products.iter().any(|p| p.category_id == Some(c.id)))
        .map(|c| c.name.clone())
        .collect()
}

/// Deal blurb shown on /start and after picking a cafe; `None` when there is
/// nothing to advertise.
fn render_discounts(discounts: &[Discount]) -> Option<String> {
    if discounts.is_empty() {
        return None;
    }
    let mut text = String::from("🎉 Today's deals:\n");
    for discount in discounts {
        text.push_str(&format!("\n📌 {}", discount.title));
        if let Some(description) = &discount.description {
            text.push_str(&format!("\n{description}"));
        }
        text.push('\n');
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            restaurant_id: Some(1),
        }
    }

    fn product(category_id: Option<i64>) -> Product {
        Product {
            id: 1,
            name: "Latte".to_string(),
            description: None,
            category_id,
            restaurant_id: Some(1),
            price: 230.0,
            discount_price: None,
            size: None,
            photo: None,
            is_available: true,
            stock: 5,
        }
    }

    #[test]
    fn test_category_names_skips_empty_categories() {
        let categories = vec![category(1, "Drinks"), category(2, "Desserts")];
        let products = vec![product(Some(1))];
        assert_eq!(category_names(&categories, &products), vec!["Drinks"]);
    }

    #[test]
    fn test_category_names_skips_uncategorized_products() {
        let categories = vec![category(1, "Drinks")];
        let products = vec![product(None)];
        assert!(category_names(&categories, &products).is_empty());
    }

    #[test]
    fn test_render_discounts_empty() {
        assert!(render_discounts(&[]).is_none());
    }

    #[test]
    fn test_render_discounts_lists_titles() {
        let discounts = vec![Discount {
            id: 1,
            title: "20% off desserts".to_string(),
            description: Some("Today only".to_string()),
            date_start: Some(Utc::now()),
            date_end: None,
            is_active: true,
            category_id: None,
            product_id: None,
            restaurant_id: Some(1),
        }];
        let text = render_discounts(&discounts).unwrap();
        assert!(text.contains("📌 20% off desserts"));
        assert!(text.contains("Today only"));
    }
}
