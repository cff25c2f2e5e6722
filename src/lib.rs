//! # Online Customer
//!
//! A food-ordering system built around a Telegram bot: customers pick a cafe,
//! browse its menu, fill a cart and check out with a phone number, while an
//! admin JSON service manages restaurants, products, categories, discounts
//! and incoming orders. New orders are forwarded to an operator chat.

pub mod admin;
pub mod bot;
pub mod config;
pub mod db;
pub mod models;
pub mod notifier;
pub mod phone;
