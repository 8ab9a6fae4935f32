//! Cart state owned by the engine.

use crate::cart::{CartItem, CartTotals};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// In-memory cart state.
///
/// `subtotal`, `tax`, `shipping` and `total` are a pure function of `items`;
/// only the reducer writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Lines in insertion order, at most one per product id.
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    /// Display currency. Changing it does not rescale prices.
    pub currency: Currency,
    /// True until the persisted snapshot has been read.
    pub is_loading: bool,
    /// Last user-facing failure, cleared by `ClearError` or a successful load.
    pub error: Option<String>,
}

impl Default for CartState {
    fn default() -> Self {
        Self::initial()
    }
}

impl CartState {
    /// The state before the persisted snapshot has been read.
    pub fn initial() -> Self {
        Self {
            is_loading: true,
            ..Self::empty(Currency::default())
        }
    }

    /// A ready, empty cart in `currency`.
    pub fn empty(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            subtotal: Money::ZERO,
            tax: Money::ZERO,
            shipping: Money::ZERO,
            total: Money::ZERO,
            currency,
            is_loading: false,
            error: None,
        }
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            shipping: self.shipping,
            total: self.total,
        }
    }

    pub(crate) fn set_totals(&mut self, totals: CartTotals) {
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.shipping = totals.shipping;
        self.total = totals.total;
    }

    /// Find the line for a product.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id.as_str() == product_id)
    }

    /// Quantity of a product, 0 if absent.
    pub fn item_quantity(&self, product_id: &str) -> i64 {
        self.item(product_id).map(|i| i.quantity).unwrap_or(0)
    }

    /// Line total of a product, 0 if absent.
    pub fn item_total(&self, product_id: &str) -> Money {
        self.item(product_id)
            .and_then(|i| i.line_total())
            .unwrap_or(Money::ZERO)
    }

    /// Sum of all quantities, saturating at `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when the fields that go into the persisted snapshot match.
    pub fn same_persisted_fields(&self, other: &CartState) -> bool {
        self.items == other.items && self.totals() == other.totals() && self.currency == other.currency
    }
}
