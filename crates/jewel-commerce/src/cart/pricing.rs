//! Cart total calculations.
//!
//! Totals are always recomputed from the full item list; nothing is
//! tracked incrementally.

use crate::cart::CartItem;
use crate::error::CommerceError;
use crate::money::{Money, Rate};
use serde::{Deserialize, Serialize};

/// VAT rate applied to every cart (Belgium, 21%).
pub const TAX_RATE: Rate = TaxRegion::Belgium.rate();

/// Flat shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING: Money = ShippingMethod::Standard.price();

/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_units(500);

/// Tax regions with their reference rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegion {
    /// Belgian VAT (21%).
    Belgium,
    /// EU average (20%).
    EuropeanUnion,
    /// US average sales tax (8%).
    UnitedStates,
}

impl TaxRegion {
    /// Reference rate for the region.
    pub const fn rate(&self) -> Rate {
        match self {
            TaxRegion::Belgium => Rate::from_basis_points(2100),
            TaxRegion::EuropeanUnion => Rate::from_basis_points(2000),
            TaxRegion::UnitedStates => Rate::from_basis_points(800),
        }
    }
}

/// Shipping options offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Premium,
}

impl ShippingMethod {
    /// Fee for the method.
    pub const fn price(&self) -> Money {
        match self {
            ShippingMethod::Standard => Money::from_units(15),
            ShippingMethod::Express => Money::from_units(25),
            ShippingMethod::Premium => Money::from_units(50),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShippingMethod::Standard => "Standard Shipping",
            ShippingMethod::Express => "Express Shipping",
            ShippingMethod::Premium => "Premium Shipping",
        }
    }
}

/// Derived monetary totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl CartTotals {
    /// All zero (the empty cart).
    pub const ZERO: CartTotals = CartTotals {
        subtotal: Money::ZERO,
        tax: Money::ZERO,
        shipping: Money::ZERO,
        total: Money::ZERO,
    };
}

/// Shipping fee for a subtotal.
pub fn shipping_for(subtotal: Money) -> Money {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        Money::ZERO
    } else {
        FLAT_SHIPPING
    }
}

/// Compute totals from a subtotal.
pub fn totals_for_subtotal(subtotal: Money) -> Result<CartTotals, CommerceError> {
    let tax = subtotal.apply_rate(TAX_RATE);
    let shipping = shipping_for(subtotal);
    let total = Money::try_sum([subtotal, tax, shipping]).ok_or(CommerceError::Overflow)?;
    Ok(CartTotals {
        subtotal,
        tax,
        shipping,
        total,
    })
}

/// Compute totals for a list of items.
///
/// An empty list yields all-zero totals (no shipping on an empty cart).
/// Totals depend on the items alone, so removing the last line lands on the
/// same zero totals as clearing the cart.
pub fn calculate_totals(items: &[CartItem]) -> Result<CartTotals, CommerceError> {
    if items.is_empty() {
        return Ok(CartTotals::ZERO);
    }
    let lines = items
        .iter()
        .map(|item| item.line_total().ok_or(CommerceError::Overflow))
        .collect::<Result<Vec<_>, _>>()?;
    let subtotal = Money::try_sum(lines).ok_or(CommerceError::Overflow)?;
    totals_for_subtotal(subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn item(id: &str, price_units: i64, quantity: i64) -> CartItem {
        CartItem::new(
            Product::new(id, format!("Piece {}", id), Money::from_units(price_units)),
            quantity,
        )
    }

    #[test]
    fn test_shipping_free_above_threshold() {
        let totals = totals_for_subtotal(Money::from_units(600)).unwrap();
        assert_eq!(totals.shipping, Money::ZERO);

        let totals = totals_for_subtotal(Money::from_units(100)).unwrap();
        assert_eq!(totals.shipping, Money::from_units(15));
    }

    #[test]
    fn test_threshold_itself_pays_shipping() {
        assert_eq!(shipping_for(Money::from_units(500)), FLAT_SHIPPING);
        assert_eq!(shipping_for(Money::from_cents(50001)), Money::ZERO);
    }

    #[test]
    fn test_tax_and_total() {
        let totals = totals_for_subtotal(Money::from_units(1000)).unwrap();
        assert_eq!(totals.tax, Money::from_units(210));
        assert_eq!(totals.total, Money::from_units(1210));
    }

    #[test]
    fn test_calculate_totals_sums_lines() {
        let items = vec![item("a", 100, 2), item("b", 50, 1)];
        let totals = calculate_totals(&items).unwrap();

        assert_eq!(totals.subtotal, Money::from_units(250));
        assert_eq!(totals.tax, Money::from_cents(5250));
        assert_eq!(totals.shipping, Money::from_units(15));
        assert_eq!(totals.total, Money::from_cents(25000 + 5250 + 1500));
    }

    #[test]
    fn test_empty_cart_is_zero() {
        assert_eq!(calculate_totals(&[]).unwrap(), CartTotals::ZERO);
    }

    #[test]
    fn test_overflow_is_reported() {
        let items = vec![CartItem::new(
            Product::new("gold", "Bar", Money::from_cents(i64::MAX / 2)),
            3,
        )];
        assert!(matches!(calculate_totals(&items), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_reference_rates() {
        assert_eq!(TAX_RATE.basis_points(), 2100);
        assert_eq!(TaxRegion::UnitedStates.rate().basis_points(), 800);
        assert_eq!(ShippingMethod::Premium.price(), Money::from_units(50));
        assert_eq!(ShippingMethod::Express.display_name(), "Express Shipping");
    }
}
