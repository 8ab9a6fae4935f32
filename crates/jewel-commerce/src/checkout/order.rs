//! Order types.

use crate::cart::CartState;
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId, UserId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order shipped.
    Shipped,
    /// Order delivered and closed.
    Completed,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the lowercase wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "completed" => Some(OrderStatus::Completed),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Statuses only move forward, and anything open can be cancelled.
    ///
    /// This is the storefront's fulfilment policy. The order store applies it
    /// on every status update instead of accepting an arbitrary status.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        next == OrderStatus::Cancelled || next.rank() > self.rank()
    }

    /// Check a transition, returning the error the order service reports.
    pub fn check_transition(&self, next: OrderStatus) -> Result<(), CommerceError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }

    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Completed => 3,
            OrderStatus::Cancelled => 4,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product line frozen at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    /// Unit price at time of order.
    pub price: Money,
    pub quantity: i64,
}

/// Who is placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn new(user_id: impl Into<UserId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::ValidationError("customer name is required".to_string()));
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(CommerceError::ValidationError(format!(
                "invalid email address: {email}"
            ))),
        }
    }
}

/// An order that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub currency: Currency,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build a pending order from the cart's current lines and totals.
    pub fn from_cart(cart: &CartState, customer: Customer) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer.validate()?;

        let items = cart
            .items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id.clone(),
                name: item.product.name.clone(),
                price: item.product.price,
                quantity: item.quantity,
            })
            .collect();

        Ok(Self {
            user_id: customer.user_id,
            customer_name: customer.name.trim().to_string(),
            customer_email: customer.email.trim().to_string(),
            items,
            subtotal: cart.subtotal,
            tax: cart.tax,
            shipping: cart.shipping,
            total: cart.total,
            currency: cart.currency,
            status: OrderStatus::Pending,
        })
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        line_quantity(&self.items)
    }
}

/// A stored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    #[serde(default)]
    pub currency: Currency,
    pub status: OrderStatus,
    /// RFC 3339 creation time, stamped by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// RFC 3339 last update time, stamped by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Order {
    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        line_quantity(&self.items)
    }
}

fn line_quantity(lines: &[OrderLine]) -> i64 {
    lines
        .iter()
        .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{reduce, CartAction};
    use crate::catalog::Product;

    fn cart_with_ring() -> CartState {
        reduce(
            &CartState::empty(Currency::EUR),
            CartAction::AddItem {
                product: Product::new("ring-1", "Solitaire Ring", Money::from_units(300)),
                quantity: 2,
            },
        )
    }

    fn alice() -> Customer {
        Customer::new("u-1", "Alice Martin", "alice@example.com")
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&OrderStatus::Completed).unwrap(), "\"completed\"");
        assert_eq!(OrderStatus::parse("Shipped"), Some(OrderStatus::Shipped));
        assert_eq!(OrderStatus::parse("delivered"), None);
    }

    #[test]
    fn test_from_cart_copies_lines_and_totals() {
        let cart = cart_with_ring();
        let order = NewOrder::from_cart(&cart, alice()).unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Solitaire Ring");
        assert_eq!(order.items[0].price, Money::from_units(300));
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.subtotal, Money::from_units(600));
        assert_eq!(order.total, cart.total);
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[test]
    fn test_item_count_saturates() {
        let pin = |id: &str| Product::new(id, "Pin", Money::ZERO);
        let cart = reduce(
            &reduce(
                &CartState::empty(Currency::EUR),
                CartAction::AddItem {
                    product: pin("a"),
                    quantity: i64::MAX,
                },
            ),
            CartAction::AddItem {
                product: pin("b"),
                quantity: 1,
            },
        );
        let order = NewOrder::from_cart(&cart, alice()).unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.item_count(), i64::MAX);
    }

    #[test]
    fn test_from_empty_cart_fails() {
        let cart = CartState::empty(Currency::EUR);
        assert!(matches!(
            NewOrder::from_cart(&cart, alice()),
            Err(CommerceError::EmptyCart)
        ));
    }

    #[test]
    fn test_from_cart_validates_customer() {
        let cart = cart_with_ring();
        let nameless = Customer::new("u-1", " ", "alice@example.com");
        assert!(NewOrder::from_cart(&cart, nameless).is_err());

        let bad_email = Customer::new("u-1", "Alice", "alice.example.com");
        assert!(NewOrder::from_cart(&cart, bad_email).is_err());
    }

    #[test]
    fn test_order_wire_shape() {
        let order = NewOrder::from_cart(&cart_with_ring(), alice()).unwrap();
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["customerEmail"], "alice@example.com");
        assert_eq!(value["items"][0]["productId"], "ring-1");
        assert_eq!(value["status"], "pending");
    }
}
