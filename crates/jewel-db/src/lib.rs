//! Document database and object storage for the jewelry storefront.
//!
//! Products, orders and user profiles live as JSON documents in named
//! collections behind the [`DocumentStore`] trait. Services on top give
//! them typed, validated access.
//!
//! # Example
//!
//! ```rust,ignore
//! use jewel_db::prelude::*;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::open("catalog.json").await?);
//! let products = ProductService::new(store.clone());
//!
//! let id = products
//!     .create(&NewProduct::new("Solitaire Ring", Money::from_units(899)).with_stock(4))
//!     .await?;
//! let ring = products.get_by_id(id.as_str()).await?;
//! ```

mod dashboard;
mod document;
mod error;
mod images;
mod orders;
mod products;
mod store;
mod users;

pub use dashboard::{DashboardService, DashboardStats};
pub use document::{deserialize_all, generate_id, to_fields, Document, Fields};
pub use error::DbError;
pub use images::{guess_mime, DataUrlImageStore, ImageStore, MemoryObjectStore};
pub use orders::{OrderService, ORDERS};
pub use products::{NewProduct, ProductPatch, ProductService, PRODUCTS};
pub use store::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
pub use users::{Role, UserProfile, UserService, USERS};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        DashboardService, DbError, DocumentStore, FileDocumentStore, ImageStore,
        MemoryDocumentStore, NewProduct, OrderService, ProductPatch, ProductService, Role,
        UserService,
    };
    pub use jewel_commerce::Money;
}
