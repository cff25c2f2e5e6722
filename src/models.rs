//! Row types for the relational schema.
//!
//! Prices are stored as REAL and snapshotted onto order items at purchase
//! time; later product edits never touch existing orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle of an order. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    New,
    Paid,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Paid => "paid",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Nulled out when the owning restaurant is deleted.
    pub restaurant_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub size: Option<String>,
    pub photo: Option<String>,
    pub is_available: bool,
    pub stock: i64,
}

impl Product {
    /// Price a customer actually pays right now.
    pub fn effective_price(&self) -> f64 {
        self.discount_price.unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Discount {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date_start: Option<DateTime<Utc>>,
    pub date_end: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Optional scoping: a discount may target one category or one product.
    pub category_id: Option<i64>,
    pub product_id: Option<i64>,
    pub restaurant_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: OrderStatus,
    /// Computed by the ordering client from snapshot prices, not re-derived.
    pub total: f64,
    pub phone: Option<String>,
    pub admin_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub price: f64,
    pub discount_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Receipt {
    pub id: i64,
    pub order_id: i64,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Order row joined with customer and restaurant names for admin listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub status: OrderStatus,
    pub total: f64,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub user_name: Option<String>,
    pub restaurant_name: Option<String>,
}

/// Order item joined with the product name for the order detail view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItemDetail {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub quantity: i64,
    pub price: f64,
    pub discount_price: Option<f64>,
    pub product_name: Option<String>,
}

/// Input for [`crate::db::create_order`]: one order plus its snapshot lines,
/// persisted in a single transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<i64>,
    pub restaurant_id: Option<i64>,
    pub total: f64,
    pub phone: Option<String>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub price: f64,
    pub discount_price: Option<f64>,
}

/// Create/update payload for a restaurant.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantInput {
    pub name: String,
    pub address: String,
}

/// Create/update payload for a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub restaurant_id: Option<i64>,
}

/// Create/update payload for a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    pub price: f64,
    #[serde(default)]
    pub discount_price: Option<f64>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub stock: i64,
}

/// Create/update payload for a discount.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_end: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
}

fn default_true() -> bool {
    true
}
