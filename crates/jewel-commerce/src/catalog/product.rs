//! Catalog product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Stock level below which a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    /// Product is listed and purchasable.
    #[default]
    Active,
    /// Product is hidden from shoppers.
    Inactive,
    /// Product is listed but nearly sold out.
    LowStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
            ProductStatus::LowStock => "low-stock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(ProductStatus::Active),
            "inactive" => Some(ProductStatus::Inactive),
            "low-stock" => Some(ProductStatus::LowStock),
            _ => None,
        }
    }
}

/// Jewelry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Rings,
    Necklaces,
    Earrings,
    Bracelets,
    Watches,
    Pendants,
    Sets,
    #[default]
    #[serde(other)]
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Rings => "rings",
            ProductCategory::Necklaces => "necklaces",
            ProductCategory::Earrings => "earrings",
            ProductCategory::Bracelets => "bracelets",
            ProductCategory::Watches => "watches",
            ProductCategory::Pendants => "pendants",
            ProductCategory::Sets => "sets",
            ProductCategory::Other => "other",
        }
    }

    /// Parse a category name; unknown names map to `Other`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rings" => ProductCategory::Rings,
            "necklaces" => ProductCategory::Necklaces,
            "earrings" => ProductCategory::Earrings,
            "bracelets" => ProductCategory::Bracelets,
            "watches" => ProductCategory::Watches,
            "pendants" => ProductCategory::Pendants,
            "sets" => ProductCategory::Sets,
            _ => ProductCategory::Other,
        }
    }
}

/// A gemstone set in a piece.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Gemstone {
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carat: Option<f64>,
}

/// A product in the catalog.
///
/// The cart stores a copy of this taken when the item was added; later
/// catalog edits do not reach that copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Money,
    /// Currency the price is quoted in.
    #[serde(default)]
    pub currency: Currency,
    /// Category.
    #[serde(default)]
    pub category: ProductCategory,
    /// Units in stock.
    #[serde(default)]
    pub stock: i64,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Listing status.
    #[serde(default)]
    pub status: ProductStatus,
    /// Metals and other materials.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    /// Set gemstones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gemstones: Vec<Gemstone>,
    /// RFC 3339 creation time, stamped by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// RFC 3339 last update time, stamped by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Product {
    /// Create an active product with the required fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            currency: Currency::default(),
            category: ProductCategory::default(),
            stock: 0,
            images: Vec::new(),
            status: ProductStatus::Active,
            materials: Vec::new(),
            gemstones: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the listing status.
    pub fn with_status(mut self, status: ProductStatus) -> Self {
        self.status = status;
        self
    }

    /// Check that this snapshot can be put in a cart.
    ///
    /// Requires an id, a non-blank name and a non-negative price.
    pub fn validate_for_cart(&self) -> Result<(), CommerceError> {
        if self.id.is_blank() {
            return Err(CommerceError::InvalidProduct("missing id".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(CommerceError::InvalidProduct(format!(
                "product {} has no name",
                self.id
            )));
        }
        if self.price.is_negative() {
            return Err(CommerceError::InvalidProduct(format!(
                "product {} has a negative price",
                self.id
            )));
        }
        Ok(())
    }

    /// Check if the product is listed for shoppers.
    pub fn is_listed(&self) -> bool {
        self.status != ProductStatus::Inactive
    }

    /// Check if the stock is below the low-stock threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_for_cart() {
        let ok = Product::new("ring-1", "Solitaire Ring", Money::from_units(899));
        assert!(ok.validate_for_cart().is_ok());

        let no_id = Product::new("", "Solitaire Ring", Money::from_units(899));
        assert!(no_id.validate_for_cart().is_err());

        let no_name = Product::new("ring-1", "   ", Money::from_units(899));
        assert!(no_name.validate_for_cart().is_err());

        let negative = Product::new("ring-1", "Solitaire Ring", Money::from_cents(-1));
        assert!(negative.validate_for_cart().is_err());
    }

    #[test]
    fn test_decodes_catalog_document() {
        let json = r#"{
            "id": "neck-7",
            "name": "Pearl Necklace",
            "description": "Freshwater pearls",
            "category": "necklaces",
            "price": 249.5,
            "stock": 4,
            "images": ["https://img/1.jpg"],
            "status": "low-stock",
            "gemstones": [{"type": "pearl", "color": "white"}]
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.price.amount_cents, 24950);
        assert_eq!(product.currency, Currency::EUR);
        assert_eq!(product.category, ProductCategory::Necklaces);
        assert_eq!(product.status, ProductStatus::LowStock);
        assert_eq!(product.gemstones[0].kind, "pearl");
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_unknown_category_is_other() {
        let json = r#"{"id": "x", "name": "Brooch", "price": 10, "category": "brooches"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.category, ProductCategory::Other);
        assert_eq!(ProductCategory::parse("RINGS"), ProductCategory::Rings);
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let json = r#"{"id": "x", "name": "Brooch"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ProductStatus::from_str("LOW-STOCK"), Some(ProductStatus::LowStock));
        assert_eq!(ProductStatus::Inactive.as_str(), "inactive");
        assert!(!Product::new("a", "b", Money::ZERO)
            .with_status(ProductStatus::Inactive)
            .is_listed());
    }
}
