//! Proof storage trait and error types.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Stored object not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object storage for payment proof files.
///
/// Keys are relative, `/`-separated paths such as
/// `payment-proofs/{user_id}/{course_id}/{file_id}.png`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProofStorage: Send + Sync {
    /// Stores `bytes` under `key`, overwriting any previous object.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    /// Reads the object back.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Removes the object. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Checks that the storage backend is reachable and writable.
    async fn health_check(&self) -> bool;
}
