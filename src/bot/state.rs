//! Conversation state for the ordering dialogue.
//!
//! One [`OrderState`] per chat, held in teloxide's in-memory dialogue
//! storage. State is ephemeral: a process restart drops every cart.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::models::Product;
use crate::notifier::format_price;

/// The restaurant a chat is currently ordering from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedRestaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

/// One cart line after resolving a product name: id and prices are
/// snapshotted here and written to the order verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingItem {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub discount_price: Option<f64>,
}

impl PendingItem {
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }
}

/// A snapshot of the cart taken at checkout time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub items: Vec<PendingItem>,
    pub total: f64,
}

impl PendingOrder {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The ordering conversation, restaurant choice through phone collection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum OrderState {
    /// No restaurant chosen yet.
    #[default]
    Start,
    /// Browsing the menu; `cart` is a multiset of product names.
    Browsing {
        restaurant: SelectedRestaurant,
        cart: Vec<String>,
    },
    /// Cart summary shown, waiting for the confirm button.
    CartReview {
        restaurant: SelectedRestaurant,
        pending: PendingOrder,
    },
    /// Order confirmed, collecting a phone number before persisting.
    AwaitingPhone {
        restaurant: SelectedRestaurant,
        pending: PendingOrder,
    },
}

pub type OrderDialogue = Dialogue<OrderState, InMemStorage<OrderState>>;

/// Collapse the cart into (name, quantity) lines, preserving the order in
/// which names were first added.
pub fn count_cart(cart: &[String]) -> Vec<(String, i64)> {
    let mut lines: Vec<(String, i64)> = Vec::new();
    for name in cart {
        match lines.iter_mut().find(|(n, _)| n == name) {
            Some((_, qty)) => *qty += 1,
            None => lines.push((name.clone(), 1)),
        }
    }
    lines
}

/// Resolve cart names against the restaurant's product list and snapshot
/// prices. Names that match no product are dropped: only real products end
/// up on the order (an all-unknown cart snapshots as empty).
pub fn snapshot_cart(products: &[Product], cart: &[String]) -> PendingOrder {
    let mut pending = PendingOrder::default();
    for (name, quantity) in count_cart(cart) {
        let Some(product) = products.iter().find(|p| p.name == name) else {
            continue;
        };
        let item = PendingItem {
            product_id: product.id,
            name,
            quantity,
            price: product.price,
            discount_price: product.discount_price,
        };
        pending.total += item.effective_price() * quantity as f64;
        pending.items.push(item);
    }
    pending
}

/// Cart summary message shown before confirmation.
pub fn render_cart_summary(restaurant: &SelectedRestaurant, pending: &PendingOrder) -> String {
    let mut text = format!(
        "Your order at {}\nAddress: {}\n\n",
        restaurant.name, restaurant.address
    );
    for item in &pending.items {
        text.push_str(&format!(
            "{} x{} — {}₽\n",
            item.name,
            item.quantity,
            format_price(item.effective_price())
        ));
    }
    text.push_str(&format!("\nTotal: {}₽", format_price(pending.total)));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: f64, discount_price: Option<f64>) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            category_id: Some(1),
            restaurant_id: Some(1),
            price,
            discount_price,
            size: None,
            photo: None,
            is_available: true,
            stock: 10,
        }
    }

    #[test]
    fn test_count_cart_preserves_first_seen_order() {
        let cart = vec![
            "Latte".to_string(),
            "Croissant".to_string(),
            "Latte".to_string(),
        ];
        assert_eq!(
            count_cart(&cart),
            vec![("Latte".to_string(), 2), ("Croissant".to_string(), 1)]
        );
    }

    #[test]
    fn test_snapshot_uses_discount_price_for_total() {
        let products = vec![
            product(1, "Cappuccino", 210.0, Some(190.0)),
            product(2, "Croissant", 180.0, None),
        ];
        let cart = vec![
            "Cappuccino".to_string(),
            "Cappuccino".to_string(),
            "Croissant".to_string(),
        ];

        let pending = snapshot_cart(&products, &cart);
        assert_eq!(pending.items.len(), 2);
        assert_eq!(pending.items[0].product_id, 1);
        assert_eq!(pending.items[0].quantity, 2);
        // The full price is snapshotted alongside the discount.
        assert_eq!(pending.items[0].price, 210.0);
        assert_eq!(pending.items[0].discount_price, Some(190.0));
        assert_eq!(pending.total, 190.0 * 2.0 + 180.0);
    }

    #[test]
    fn test_snapshot_drops_unknown_names() {
        let products = vec![product(1, "Latte", 230.0, None)];
        let cart = vec!["Latte".to_string(), "Unicorn Smoothie".to_string()];

        let pending = snapshot_cart(&products, &cart);
        assert_eq!(pending.items.len(), 1);
        assert_eq!(pending.total, 230.0);
    }

    #[test]
    fn test_snapshot_of_unknown_only_cart_is_empty() {
        let products = vec![product(1, "Latte", 230.0, None)];
        let cart = vec!["Unicorn Smoothie".to_string()];
        assert!(snapshot_cart(&products, &cart).is_empty());
    }

    #[test]
    fn test_render_cart_summary() {
        let restaurant = SelectedRestaurant {
            id: 1,
            name: "You Coffee".to_string(),
            address: "25 Kabardinskaya St".to_string(),
        };
        let products = vec![product(1, "Cappuccino", 210.0, Some(190.0))];
        let pending = snapshot_cart(&products, &["Cappuccino".to_string()]);

        let text = render_cart_summary(&restaurant, &pending);
        assert!(text.contains("Your order at You Coffee"));
        assert!(text.contains("Cappuccino x1 — 190₽"));
        assert!(text.contains("Total: 190₽"));
    }

    #[test]
    fn test_default_state_is_start() {
        assert!(matches!(OrderState::default(), OrderState::Start));
    }
}
