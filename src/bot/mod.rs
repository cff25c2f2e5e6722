//! Bot module for the ordering conversation
//!
//! This module is split into several submodules for better organization:
//! - `state`: Dialogue state machine, cart snapshotting and summaries
//! - `keyboards`: Reply keyboards and the button-label protocol
//! - `message_handler`: Dispatches incoming messages over the state machine
//! - `order_manager`: Checkout, phone collection and order persistence

pub mod keyboards;
pub mod message_handler;
pub mod order_manager;
pub mod state;

// Re-export the pieces main.rs and the tests wire together.
pub use message_handler::message_handler;
pub use state::{
    count_cart, render_cart_summary, snapshot_cart, OrderDialogue, OrderState, PendingItem,
    PendingOrder, SelectedRestaurant,
};
