//! Reply keyboards and the button labels that drive message dispatch.
//!
//! The conversation is entirely text-button based; these constants are the
//! protocol between what we render and what the handler matches on.

use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup};

use crate::models::{Product, Restaurant};

pub const CHOOSE_CAFE_BTN: &str = "🏢 Choose a cafe";
pub const MENU_BTN: &str = "Our menu";
pub const CHECKOUT_BTN: &str = "🛒 Checkout";
pub const CONFIRM_ORDER_BTN: &str = "✅ Confirm order";
pub const BACK_TO_CATEGORIES_BTN: &str = "⬅️ Back to categories";
pub const MAIN_MENU_BTN: &str = "⬅️ Main menu";
pub const SHARE_PHONE_BTN: &str = "📱 Share phone number";
pub const MANUAL_PHONE_BTN: &str = "✏️ Enter manually";
pub const CANCEL_ORDER_BTN: &str = "⬅️ Cancel order";

/// Separator used in restaurant rows; a message containing it is treated as
/// a restaurant selection.
pub const RESTAURANT_SEPARATOR: &str = " | ";

fn single_column(labels: impl IntoIterator<Item = String>) -> KeyboardMarkup {
    let rows = labels
        .into_iter()
        .map(|label| vec![KeyboardButton::new(label)]);
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn choose_restaurant_keyboard() -> KeyboardMarkup {
    single_column([CHOOSE_CAFE_BTN.to_string()])
}

/// One row per restaurant, rendered as `name | address`.
pub fn restaurant_list_keyboard(restaurants: &[Restaurant]) -> KeyboardMarkup {
    single_column(
        restaurants
            .iter()
            .map(|r| format!("{}{}{}", r.name, RESTAURANT_SEPARATOR, r.address)),
    )
}

pub fn menu_keyboard() -> KeyboardMarkup {
    single_column([MENU_BTN.to_string()])
}

pub fn categories_keyboard(categories: &[String]) -> KeyboardMarkup {
    single_column(
        categories
            .iter()
            .cloned()
            .chain([CHECKOUT_BTN.to_string(), MAIN_MENU_BTN.to_string()]),
    )
}

pub fn products_keyboard(products: &[&Product]) -> KeyboardMarkup {
    single_column(
        products
            .iter()
            .map(|p| p.name.clone())
            .chain([BACK_TO_CATEGORIES_BTN.to_string()]),
    )
}

pub fn cart_review_keyboard() -> KeyboardMarkup {
    single_column([
        CONFIRM_ORDER_BTN.to_string(),
        BACK_TO_CATEGORIES_BTN.to_string(),
    ])
}

/// Contact-request button first, manual entry and cancel below it.
pub fn phone_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([
        vec![KeyboardButton::new(SHARE_PHONE_BTN).request(ButtonRequest::Contact)],
        vec![KeyboardButton::new(MANUAL_PHONE_BTN)],
        vec![KeyboardButton::new(CANCEL_ORDER_BTN)],
    ])
    .resize_keyboard()
}

pub fn manual_phone_keyboard() -> KeyboardMarkup {
    single_column([CANCEL_ORDER_BTN.to_string()])
}
