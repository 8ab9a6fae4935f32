//! Product catalog service.

use std::sync::Arc;

use jewel_commerce::catalog::{Gemstone, Product, ProductCategory, ProductStatus};
use jewel_commerce::{Currency, Money, ProductId};
use serde::{Deserialize, Serialize};

use crate::document::{deserialize_all, to_fields};
use crate::{DbError, DocumentStore};

/// Collection holding products.
pub const PRODUCTS: &str = "products";

/// A product to be added to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ProductCategory,
    pub price: Money,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gemstones: Vec<Gemstone>,
}

impl NewProduct {
    /// An active product with only the required fields set.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: ProductCategory::default(),
            price,
            currency: Currency::default(),
            stock: 0,
            images: Vec::new(),
            status: ProductStatus::Active,
            materials: Vec::new(),
            gemstones: Vec::new(),
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

    /// Name must be non-blank; price and stock must not be negative.
    pub fn validate(&self) -> Result<(), DbError> {
        check_name(&self.name)?;
        check_price(self.price)?;
        check_stock(self.stock)
    }
}

/// Fields to change on an existing product. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// Same rules as [`NewProduct::validate`] for the fields present.
    pub fn validate(&self) -> Result<(), DbError> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        if let Some(stock) = self.stock {
            check_stock(stock)?;
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), DbError> {
    if name.trim().is_empty() {
        return Err(DbError::Validation("product name is required".to_string()));
    }
    Ok(())
}

fn check_price(price: Money) -> Result<(), DbError> {
    if price.is_negative() {
        return Err(DbError::Validation(format!(
            "price cannot be negative: {}",
            price.display_amount()
        )));
    }
    Ok(())
}

fn check_stock(stock: i64) -> Result<(), DbError> {
    if stock < 0 {
        return Err(DbError::Validation(format!("stock cannot be negative: {stock}")));
    }
    Ok(())
}

/// Product CRUD over a document store.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn DocumentStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every product, listed or not.
    pub async fn list_all(&self) -> Result<Vec<Product>, DbError> {
        deserialize_all(&self.store.list(PRODUCTS).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Product>, DbError> {
        match self.store.get(PRODUCTS, id).await? {
            Some(doc) => Ok(Some(doc.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Active products in one category.
    pub async fn list_by_category(&self, category: ProductCategory) -> Result<Vec<Product>, DbError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|p| p.category == category && p.status == ProductStatus::Active)
            .collect())
    }

    /// Validate and store a product, returning its new id.
    pub async fn create(&self, product: &NewProduct) -> Result<ProductId, DbError> {
        product.validate()?;
        let id = self.store.insert(PRODUCTS, to_fields(product)?).await?;
        Ok(ProductId::new(id))
    }

    pub async fn update(&self, id: &str, patch: &ProductPatch) -> Result<(), DbError> {
        patch.validate()?;
        self.store.update(PRODUCTS, id, to_fields(patch)?).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        self.store.delete(PRODUCTS, id).await
    }
}
