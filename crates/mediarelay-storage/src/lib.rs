//! Mediarelay Storage Library
//!
//! Object storage abstraction for relayed media. Backends: S3 (and S3-compatible
//! providers), the local filesystem and an in-process memory store.
//!
//! # Storage key format
//!
//! Keys are flat: `{unix_millis}.{extension}`, e.g. `1718000000000.mp4`. Two
//! uploads that finish in the same millisecond with the same extension map to
//! the same key and the later one overwrites the earlier.
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::generate_storage_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediarelay_core::StorageBackend;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
