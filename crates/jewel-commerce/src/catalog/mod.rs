//! Product catalog module.
//!
//! Contains the product snapshot shared by the catalog service and the cart.

mod product;

pub use product::{
    Gemstone, Product, ProductCategory, ProductStatus, LOW_STOCK_THRESHOLD,
};
