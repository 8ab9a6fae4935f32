//! Storefront domain types and the shopping-cart engine for a jewelry shop.
//!
//! - **Catalog**: product snapshots, categories, gemstones
//! - **Cart**: cart state, pure reducer, pricing, persisted snapshot, [`CartEngine`]
//! - **Checkout**: orders built from a cart
//!
//! # Example
//!
//! ```rust,ignore
//! use jewel_commerce::prelude::*;
//! use jewel_cache::MemoryStore;
//! use jewel_observability::StructuredLogger;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut cart = CartEngine::open(store, StructuredLogger::new("cart")).await;
//!
//! let ring = Product::new("ring-1", "Solitaire Ring", Money::from_units(899));
//! cart.add_item(Some(&ring), 1);
//!
//! let state = cart.state();
//! println!("Total: {}", state.total.display(state.currency));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::CartEngine;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money, Rate};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, Rate};

    // Catalog
    pub use crate::catalog::{Gemstone, Product, ProductCategory, ProductStatus};

    // Cart
    pub use crate::cart::{
        CartAction, CartEngine, CartItem, CartState, CartTotals, PersistedCart, CART_STORAGE_KEY,
    };

    // Checkout
    pub use crate::checkout::{Customer, NewOrder, Order, OrderLine, OrderStatus};
}
