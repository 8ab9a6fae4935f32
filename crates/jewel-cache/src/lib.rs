//! Local key-value store for persisted storefront state.
//!
//! Provides a small async storage seam (`KvStore`) with in-memory and
//! file-backed implementations, plus a typed `Cache` wrapper with
//! automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use jewel_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//!
//! // Store a value
//! cache.set("cart", &snapshot).await?;
//!
//! // Retrieve a value
//! let snapshot: Option<Snapshot> = cache.get("cart").await?;
//!
//! // Delete a value
//! cache.delete("cart").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KvStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
