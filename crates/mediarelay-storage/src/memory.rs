//! In-process storage backend.
//!
//! Objects live in a map for the lifetime of the process. Used for local
//! development without a bucket and as the storage double in tests.

use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Clone)]
pub struct MemoryStorage {
    base_url: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn objects(&self) -> MutexGuard<'_, HashMap<String, StoredObject>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, storage_key: &str) -> Option<StoredObject> {
        self.objects().get(storage_key).cloned()
    }

    pub fn content_type_of(&self, storage_key: &str) -> Option<String> {
        self.get(storage_key).map(|o| o.content_type)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("memory://mediarelay")
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        let size = data.len();

        self.objects().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        tracing::debug!(
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            "Memory storage upload successful"
        );

        Ok(self.object_url(storage_key))
    }

    async fn get_object(&self, storage_key: &str) -> StorageResult<Bytes> {
        self.get(storage_key)
            .map(|o| o.data)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.objects().contains_key(storage_key))
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
