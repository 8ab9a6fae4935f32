//! Checkout module.
//!
//! Turns a cart into an order for the document database.

mod order;

pub use order::{Customer, NewOrder, Order, OrderLine, OrderStatus};
