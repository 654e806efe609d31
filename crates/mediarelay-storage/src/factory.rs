#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-memory")]
use crate::MemoryStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use mediarelay_core::Config;
use std::sync::Arc;

/// Build the backend named by `STORAGE_BACKEND` (S3 when unset).
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend().unwrap_or(StorageBackend::S3);
    tracing::debug!(backend = %backend, "Creating storage backend");

    let storage: Arc<dyn Storage> = match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => Arc::new(S3Storage::new(
            required(config.s3_bucket(), "S3_BUCKET")?.to_string(),
            required(config.effective_s3_region(), "S3_REGION or AWS_REGION")?.to_string(),
            config.s3_endpoint().map(String::from),
        )?),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => Arc::new(
            LocalStorage::new(
                required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?,
                required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?.to_string(),
            )
            .await?,
        ),

        #[cfg(feature = "storage-memory")]
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; uploaded objects are lost on restart");
            Arc::new(MemoryStorage::default())
        }

        #[allow(unreachable_patterns)]
        other => {
            return Err(StorageError::ConfigError(format!(
                "{} storage backend not compiled in (enable the storage-{} feature)",
                other, other
            )))
        }
    };

    Ok(storage)
}

fn required<'a>(value: Option<&'a str>, setting: &str) -> StorageResult<&'a str> {
    value.ok_or_else(|| StorageError::ConfigError(format!("{} not configured", setting)))
}
