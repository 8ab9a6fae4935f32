//! Persisted cart snapshot: the document written to the key-value store.
//!
//! Decoding is a schema check. Anything that does not decode into a
//! `PersistedCart` is treated as corrupt and discarded by the engine.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartItem, CartState};
use crate::money::{Currency, Money};

/// Key the snapshot is stored under.
pub const CART_STORAGE_KEY: &str = "cart";

/// Why a stored snapshot was rejected.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Not JSON, or fields missing or of the wrong type.
    #[error("malformed cart snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An item with a blank product id.
    #[error("cart item without a product id")]
    BlankProductId,

    /// Item id and embedded product id disagree.
    #[error("cart item {item} embeds product {product}")]
    MismatchedProduct { item: String, product: String },

    /// Quantity is zero or negative.
    #[error("cart item {product_id} has non-positive quantity {quantity}")]
    NonPositiveQuantity { product_id: String, quantity: i64 },

    /// Same product listed twice.
    #[error("cart item {0} appears more than once")]
    DuplicateItem(String),
}

/// Serialized form of a cart.
///
/// `{items, subtotal, tax, shipping, total, currency, updatedAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub currency: Currency,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedCart {
    /// The empty default cart.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Money::ZERO,
            tax: Money::ZERO,
            shipping: Money::ZERO,
            total: Money::ZERO,
            currency: Currency::default(),
            updated_at: None,
        }
    }

    /// Capture the persisted fields of `state`.
    pub fn from_state(state: &CartState, updated_at: DateTime<Utc>) -> Self {
        Self {
            items: state.items.clone(),
            subtotal: state.subtotal,
            tax: state.tax,
            shipping: state.shipping,
            total: state.total,
            currency: state.currency,
            updated_at: Some(updated_at),
        }
    }

    /// Decode and validate a stored snapshot.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: PersistedCart = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Encode as JSON.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.product_id.is_blank() {
                return Err(SnapshotError::BlankProductId);
            }
            if item.product_id != item.product.id {
                return Err(SnapshotError::MismatchedProduct {
                    item: item.product_id.to_string(),
                    product: item.product.id.to_string(),
                });
            }
            if item.quantity <= 0 {
                return Err(SnapshotError::NonPositiveQuantity {
                    product_id: item.product_id.to_string(),
                    quantity: item.quantity,
                });
            }
            if !seen.insert(item.product_id.as_str()) {
                return Err(SnapshotError::DuplicateItem(item.product_id.to_string()));
            }
        }
        Ok(())
    }
}
