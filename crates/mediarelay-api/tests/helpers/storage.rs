//! Storage double that rejects every operation.

use async_trait::async_trait;
use bytes::Bytes;
use mediarelay_storage::{Storage, StorageBackend, StorageError, StorageResult};

pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        _data: Bytes,
        _content_type: &str,
    ) -> StorageResult<String> {
        Err(StorageError::UploadFailed(format!(
            "Access Denied writing {}",
            storage_key
        )))
    }

    async fn get_object(&self, storage_key: &str) -> StorageResult<Bytes> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("memory://failing/{}", storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
