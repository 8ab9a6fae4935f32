//! Document store trait and its in-memory and single-file backends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::document::{generate_id, timestamp, Document, Fields, CREATED_AT, UPDATED_AT};
use crate::DbError;

/// Collections of JSON documents addressed by id.
///
/// `insert` and `set` stamp `createdAt` and `updatedAt`; `update` stamps
/// `updatedAt`. Documents are listed in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError>;

    /// One document, or `None` if absent.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError>;

    /// Add a document under a fresh id and return the id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DbError>;

    /// Create or replace a document under a caller-chosen id.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DbError>;

    /// Shallow-merge `patch` into an existing document.
    ///
    /// Fails with [`DbError::NotFound`] if the document does not exist.
    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), DbError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        (**self).list(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
        (**self).get(collection, id).await
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DbError> {
        (**self).insert(collection, fields).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DbError> {
        (**self).set(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), DbError> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
        (**self).delete(collection, id).await
    }
}

/// Every collection, as written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Collections(BTreeMap<String, Vec<Document>>);

impl Collections {
    fn list(&self, collection: &str) -> Vec<Document> {
        self.0.get(collection).cloned().unwrap_or_default()
    }

    fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.0
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned()
    }

    fn set(&mut self, collection: &str, id: &str, mut fields: Fields) {
        let now = Value::String(timestamp());
        fields.insert(UPDATED_AT.to_string(), now.clone());

        let docs = self.0.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(existing) => {
                let created = existing.fields.get(CREATED_AT).cloned().unwrap_or(now);
                fields.insert(CREATED_AT.to_string(), created);
                existing.fields = fields;
            }
            None => {
                fields.insert(CREATED_AT.to_string(), now);
                docs.push(Document::new(id, fields));
            }
        }
    }

    fn update(&mut self, collection: &str, id: &str, patch: Fields) -> Result<(), DbError> {
        let doc = self
            .0
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| DbError::not_found(collection, id))?;
        for (key, value) in patch {
            if key != "id" && key != CREATED_AT {
                doc.fields.insert(key, value);
            }
        }
        doc.fields
            .insert(UPDATED_AT.to_string(), Value::String(timestamp()));
        Ok(())
    }

    fn delete(&mut self, collection: &str, id: &str) {
        if let Some(docs) = self.0.get_mut(collection) {
            docs.retain(|d| d.id != id);
        }
    }
}

/// In-memory document store (for development and testing).
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<Collections>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, DbError> {
        self.collections
            .lock()
            .map_err(|_| DbError::StoreError("document store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        Ok(self.lock()?.list(collection))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
        Ok(self.lock()?.get(collection, id))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DbError> {
        let id = generate_id();
        self.lock()?.set(collection, &id, fields);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DbError> {
        self.lock()?.set(collection, id, fields);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), DbError> {
        self.lock()?.update(collection, id, patch)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
        self.lock()?.delete(collection, id);
        Ok(())
    }
}

/// Document store kept in a single JSON file.
///
/// The whole file is rewritten (via a temporary sibling and a rename) on
/// every write. A write that fails leaves both the file and the in-memory
/// copy unchanged.
#[derive(Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
    collections: tokio::sync::Mutex<Collections>,
}

impl FileDocumentStore {
    /// Open the file at `path`, starting empty if it does not exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();
        let collections = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => return Err(DbError::OpenError(format!("{}: {}", path.display(), e))),
        };
        Ok(Self {
            path,
            collections: tokio::sync::Mutex::new(collections),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write<R>(
        &self,
        change: impl FnOnce(&mut Collections) -> Result<R, DbError>,
    ) -> Result<R, DbError> {
        let mut guard = self.collections.lock().await;
        let mut next = guard.clone();
        let result = change(&mut next)?;
        self.save(&next).await?;
        *guard = next;
        Ok(result)
    }

    async fn save(&self, collections: &Collections) -> Result<(), DbError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(collections)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        Ok(self.collections.lock().await.list(collection))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, DbError> {
        Ok(self.collections.lock().await.get(collection, id))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<String, DbError> {
        let id = generate_id();
        self.write(|c| {
            c.set(collection, &id, fields);
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), DbError> {
        self.write(|c| {
            c.set(collection, id, fields);
            Ok(())
        })
        .await
    }

    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<(), DbError> {
        self.write(|c| c.update(collection, id, patch)).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DbError> {
        self.write(|c| {
            c.delete(collection, id);
            Ok(())
        })
        .await
    }
}
