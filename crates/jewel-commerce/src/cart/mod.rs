//! Shopping cart module.
//!
//! Contains the cart state, its pure reducer and pricing rules, the persisted
//! snapshot format, and the [`CartEngine`] that ties them to a key-value store.

mod engine;
mod item;
mod pricing;
mod reducer;
mod snapshot;
mod state;
mod writer;

pub use engine::CartEngine;
pub use item::CartItem;
pub use pricing::{
    calculate_totals, shipping_for, totals_for_subtotal, CartTotals, ShippingMethod, TaxRegion,
    FLAT_SHIPPING, FREE_SHIPPING_THRESHOLD, TAX_RATE,
};
pub use reducer::{
    reduce, CartAction, INVALID_PRODUCT_MESSAGE, INVALID_QUANTITY_MESSAGE, LOAD_FAILED_MESSAGE,
};
pub use snapshot::{PersistedCart, SnapshotError, CART_STORAGE_KEY};
pub use state::CartState;
