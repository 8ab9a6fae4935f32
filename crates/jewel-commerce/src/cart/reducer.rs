//! Cart actions and the pure state transition function.

use crate::cart::{calculate_totals, CartItem, CartState, PersistedCart};
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Currency;

/// Message stored in `error` when a product fails validation.
pub const INVALID_PRODUCT_MESSAGE: &str = "Invalid product data";

/// Message stored in `error` when a quantity cannot be applied.
pub const INVALID_QUANTITY_MESSAGE: &str = "Invalid quantity";

/// Message stored in `error` when the persisted cart could not be read.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load cart";

/// Everything that can happen to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// The persisted snapshot is being read.
    Loading,
    /// A snapshot (or the empty default) was read.
    Loaded(PersistedCart),
    /// Reading failed; start over with an empty cart.
    LoadFailed(String),
    /// A mutation was rejected before it reached the items.
    Rejected(String),
    AddItem { product: Product, quantity: i64 },
    RemoveItem(ProductId),
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    ClearCart,
    UpdateCurrency(Currency),
    ClearError,
}

/// Apply `action` to `state`, returning the next state.
///
/// Item-changing actions recompute totals from scratch. If that fails
/// (money overflow) the action is rejected and only `error` changes.
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::Loading => CartState {
            is_loading: true,
            error: None,
            ..state.clone()
        },
        CartAction::Loaded(snapshot) => {
            // An unpriceable snapshot keeps its currency but not its items.
            let mut next = CartState::empty(snapshot.currency);
            if let Ok(totals) = calculate_totals(&snapshot.items) {
                next.items = snapshot.items;
                next.set_totals(totals);
            }
            next
        }
        CartAction::LoadFailed(message) => CartState {
            error: Some(message),
            ..CartState::empty(state.currency)
        },
        CartAction::Rejected(message) => CartState {
            error: Some(message),
            ..state.clone()
        },
        CartAction::AddItem { product, quantity } => {
            if quantity <= 0 {
                return state.clone();
            }
            let mut items = state.items.clone();
            match items.iter_mut().find(|i| i.product_id == product.id) {
                Some(existing) => match existing.quantity.checked_add(quantity) {
                    Some(q) => existing.quantity = q,
                    None => return reject(state, INVALID_QUANTITY_MESSAGE),
                },
                None => items.push(CartItem::new(product, quantity)),
            }
            with_items(state, items)
        }
        CartAction::RemoveItem(product_id) => {
            let items = state
                .items
                .iter()
                .filter(|i| i.product_id != product_id)
                .cloned()
                .collect();
            with_items(state, items)
        }
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        } => {
            if quantity <= 0 {
                return reduce(state, CartAction::RemoveItem(product_id));
            }
            let items = state
                .items
                .iter()
                .map(|i| {
                    if i.product_id == product_id {
                        CartItem {
                            quantity,
                            ..i.clone()
                        }
                    } else {
                        i.clone()
                    }
                })
                .collect();
            with_items(state, items)
        }
        CartAction::ClearCart => CartState {
            is_loading: state.is_loading,
            error: state.error.clone(),
            ..CartState::empty(state.currency)
        },
        CartAction::UpdateCurrency(currency) => CartState {
            currency,
            ..state.clone()
        },
        CartAction::ClearError => CartState {
            error: None,
            ..state.clone()
        },
    }
}

fn with_items(state: &CartState, items: Vec<CartItem>) -> CartState {
    match calculate_totals(&items) {
        Ok(totals) => {
            let mut next = CartState {
                items,
                ..state.clone()
            };
            next.set_totals(totals);
            next
        }
        Err(_) => reject(state, INVALID_QUANTITY_MESSAGE),
    }
}

fn reject(state: &CartState, message: &str) -> CartState {
    reduce(state, CartAction::Rejected(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::FLAT_SHIPPING;
    use crate::money::Money;

    fn ready() -> CartState {
        CartState::empty(Currency::EUR)
    }

    fn ring(price_units: i64) -> Product {
        Product::new("ring-1", "Solitaire Ring", Money::from_units(price_units))
    }

    fn add(state: &CartState, product: Product, quantity: i64) -> CartState {
        reduce(state, CartAction::AddItem { product, quantity })
    }

    #[test]
    fn test_add_same_product_merges() {
        let state = add(&ready(), ring(100), 2);
        let state = add(&state, ring(100), 3);

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.item_quantity("ring-1"), 5);
        assert_eq!(state.subtotal, Money::from_units(500));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let state = add(&ready(), ring(100), 1);
        let state = add(
            &state,
            Product::new("neck-1", "Chain", Money::from_units(40)),
            1,
        );
        let state = add(&state, ring(100), 1);

        let ids: Vec<&str> = state.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["ring-1", "neck-1"]);
    }

    #[test]
    fn test_add_non_positive_quantity_is_noop() {
        let state = add(&ready(), ring(100), 0);
        assert_eq!(state, ready());
        let state = add(&ready(), ring(100), -2);
        assert_eq!(state, ready());
    }

    #[test]
    fn test_merge_overflow_is_rejected() {
        let state = add(&ready(), Product::new("p", "Pin", Money::ZERO), i64::MAX);
        let next = add(&state, Product::new("p", "Pin", Money::ZERO), 1);

        assert_eq!(next.items, state.items);
        assert_eq!(next.error.as_deref(), Some(INVALID_QUANTITY_MESSAGE));
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let state = add(&ready(), ring(100), 2);
        let state = reduce(
            &state,
            CartAction::UpdateQuantity {
                product_id: "ring-1".into(),
                quantity: 7,
            },
        );
        assert_eq!(state.item_quantity("ring-1"), 7);
        assert_eq!(state.subtotal, Money::from_units(700));
        assert_eq!(state.shipping, Money::ZERO);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let state = add(&ready(), ring(100), 2);
        let state = reduce(
            &state,
            CartAction::UpdateQuantity {
                product_id: "ring-1".into(),
                quantity: 0,
            },
        );
        assert!(state.is_empty());
        assert_eq!(state.total, Money::ZERO);
    }

    #[test]
    fn test_removing_last_line_matches_clear() {
        let state = add(&ready(), ring(100), 1);
        assert_eq!(state.shipping, FLAT_SHIPPING);

        let removed = reduce(&state, CartAction::RemoveItem("ring-1".into()));
        let cleared = reduce(&state, CartAction::ClearCart);

        assert_eq!(removed.shipping, Money::ZERO);
        assert_eq!(removed.total, Money::ZERO);
        assert_eq!(removed, cleared);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let state = add(&ready(), ring(100), 1);
        let next = reduce(&state, CartAction::RemoveItem("other".into()));
        assert_eq!(next, state);
    }

    #[test]
    fn test_clear_cart_preserves_currency() {
        let state = reduce(&ready(), CartAction::UpdateCurrency(Currency::USD));
        let state = add(&state, ring(1000), 1);
        let state = reduce(&state, CartAction::ClearCart);

        assert!(state.is_empty());
        assert_eq!(state.totals(), crate::cart::CartTotals::ZERO);
        assert_eq!(state.currency, Currency::USD);
    }

    #[test]
    fn test_update_currency_does_not_rescale() {
        let state = add(&ready(), ring(100), 1);
        let next = reduce(&state, CartAction::UpdateCurrency(Currency::USD));

        assert_eq!(next.currency, Currency::USD);
        assert_eq!(next.totals(), state.totals());
        assert_eq!(next.items, state.items);
    }

    #[test]
    fn test_rejected_then_clear_error() {
        let state = add(&ready(), ring(100), 1);
        let rejected = reduce(&state, CartAction::Rejected(INVALID_PRODUCT_MESSAGE.into()));
        assert_eq!(rejected.items, state.items);
        assert_eq!(rejected.error.as_deref(), Some(INVALID_PRODUCT_MESSAGE));

        let cleared = reduce(&rejected, CartAction::ClearError);
        assert_eq!(cleared, state);
    }

    #[test]
    fn test_load_failed_empties_and_sets_error() {
        let state = reduce(&CartState::initial(), CartAction::LoadFailed(LOAD_FAILED_MESSAGE.into()));
        assert!(!state.is_loading);
        assert!(state.is_empty());
        assert_eq!(state.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn test_loaded_recomputes_totals() {
        let items = vec![CartItem::new(ring(1000), 1)];
        let snapshot = PersistedCart {
            items,
            subtotal: Money::from_units(1),
            tax: Money::ZERO,
            shipping: Money::ZERO,
            total: Money::from_units(1),
            currency: Currency::USD,
            updated_at: None,
        };
        let state = reduce(&CartState::initial(), CartAction::Loaded(snapshot));

        assert!(!state.is_loading);
        assert_eq!(state.currency, Currency::USD);
        assert_eq!(state.subtotal, Money::from_units(1000));
        assert_eq!(state.total, Money::from_units(1210));
    }
}
