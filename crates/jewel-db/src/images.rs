//! Product image storage.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;

use crate::DbError;

/// Object storage for product images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` at `path` and return a URL a browser can load.
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, DbError>;

    /// Remove the object at `path`.
    async fn delete(&self, path: &str) -> Result<(), DbError>;
}

/// Guess an image MIME type from magic bytes, then from the extension.
pub fn guess_mime(bytes: &[u8], path: &str) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
    ];
    for &(magic, mime) in SIGNATURES {
        if bytes.starts_with(magic) {
            return mime;
        }
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }

    let ext = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn check_path(path: &str) -> Result<(), DbError> {
    if path.trim().is_empty() {
        return Err(DbError::Validation("image path is required".to_string()));
    }
    Ok(())
}

/// Embeds the image in the URL itself; nothing is stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlImageStore;

#[async_trait]
impl ImageStore for DataUrlImageStore {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, DbError> {
        check_path(path)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{}", guess_mime(bytes, path), encoded))
    }

    async fn delete(&self, _path: &str) -> Result<(), DbError> {
        Ok(())
    }
}

/// In-memory object store (for development and testing).
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored at `path`.
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(path).cloned()
    }

    fn with_objects<R>(&self, f: impl FnOnce(&mut HashMap<String, Vec<u8>>) -> R) -> Result<R, DbError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| DbError::StoreError("object store lock poisoned".to_string()))?;
        Ok(f(&mut objects))
    }
}

#[async_trait]
impl ImageStore for MemoryObjectStore {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<String, DbError> {
        check_path(path)?;
        let path = path.trim_start_matches('/').to_string();
        self.with_objects(|o| o.insert(path.clone(), bytes.to_vec()))?;
        Ok(format!("memory://{path}"))
    }

    async fn delete(&self, path: &str) -> Result<(), DbError> {
        let key = path.trim_start_matches('/');
        match self.with_objects(|o| o.remove(key))? {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("objects", key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[tokio::test]
    async fn test_data_url_upload() {
        let url = DataUrlImageStore.upload(PNG, "products/ring.bin").await.unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let encoded = url.trim_start_matches("data:image/png;base64,");
        let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, PNG);
    }

    #[tokio::test]
    async fn test_blank_path_rejected() {
        assert!(DataUrlImageStore.upload(PNG, " ").await.is_err());
    }

    #[test]
    fn test_guess_mime_by_extension() {
        assert_eq!(guess_mime(b"", "a/b.JPG"), "image/jpeg");
        assert_eq!(guess_mime(b"", "a/b"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_memory_object_store() {
        let store = MemoryObjectStore::new();
        let url = store.upload(PNG, "/products/ring.png").await.unwrap();
        assert_eq!(url, "memory://products/ring.png");
        assert_eq!(store.object("products/ring.png").as_deref(), Some(PNG));

        store.delete("products/ring.png").await.unwrap();
        assert!(store.object("products/ring.png").is_none());
        assert!(store.delete("products/ring.png").await.is_err());
    }
}
