//! The persistent key/value substrate.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the persistent substrate.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem fault.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend rejected the operation (quota, read-only media).
    #[error("storage backend fault: {0}")]
    Backend(String),
}

/// A persistent string-keyed, string-valued store.
///
/// Values are opaque to the backend; the [`ExpiringStore`](super::ExpiringStore)
/// layers JSON entry envelopes on top. Implementations are fallible here so
/// the cache layer can decide how faults surface (it logs and degrades).
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the raw value for `key`, or `None` when absent.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any existing value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    async fn clear(&self) -> Result<(), StorageError>;
}
