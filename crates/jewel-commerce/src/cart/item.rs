//! Cart line items.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One product in the cart with its quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product being purchased; equals `product.id`.
    pub product_id: ProductId,
    /// Always positive.
    pub quantity: i64,
    /// Denormalized product snapshot taken when the item was added.
    pub product: Product,
}

impl CartItem {
    /// Create a line for a product snapshot.
    pub fn new(product: Product, quantity: i64) -> Self {
        Self {
            product_id: product.id.clone(),
            quantity,
            product,
        }
    }

    /// `price × quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.product.price.checked_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = CartItem::new(
            Product::new("ear-3", "Hoop Earrings", Money::from_cents(12950)),
            3,
        );
        assert_eq!(item.product_id.as_str(), "ear-3");
        assert_eq!(item.line_total(), Some(Money::from_cents(38850)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = CartItem::new(Product::new("p", "Ring", Money::from_units(10)), 1);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "p");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["product"]["price"], 10.0);
    }
}
