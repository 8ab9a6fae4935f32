//! Database error types.

use jewel_commerce::CommerceError;
use thiserror::Error;

/// Errors that can occur when using the document database.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the backing file.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// A read or write against the backend failed.
    #[error("Storage operation failed: {0}")]
    StoreError(String),

    /// Failed to deserialize a document.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),

    /// No document with this id.
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// Input rejected before it reached the store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Domain rule violated.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

impl DbError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        DbError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}
