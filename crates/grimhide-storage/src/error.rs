//! Storage error types.

use thiserror::Error;

/// Errors that can occur when talking to the storage area.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached (private mode, blocked cookies).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Writing the value would exceed the origin's quota.
    #[error("Storage quota exceeded writing {key}: {needed} bytes needed, {available} available")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// Stored value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether the storage area itself failed, as opposed to the stored value.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::Unavailable(_) | StorageError::QuotaExceeded { .. }
        )
    }
}
