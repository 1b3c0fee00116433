//! Commerce error types.

use grimhide_storage::StorageError;
use thiserror::Error;

/// The three ways a storefront operation can go wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The storage area cannot be read or written. Recovered in memory.
    StorageUnavailable,
    /// The stored value is not a valid cart. Recovered as an empty cart.
    MalformedPersistedData,
    /// The caller asked for something that cannot be done.
    InvalidOperation,
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommerceError {
    /// Storage is disabled, blocked or full.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Stored cart is not valid JSON or not the expected shape.
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Variant value not offered by the product.
    #[error("Invalid variant for {product_id}: {attribute} = {value}")]
    InvalidVariant {
        product_id: String,
        attribute: String,
        value: String,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity text that is not a positive integer.
    #[error("Invalid quantity input: {0:?}")]
    InvalidQuantityInput(String),

    /// Price that is negative or not a number.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,
}

impl CommerceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            CommerceError::MalformedPersistedData(_) => ErrorKind::MalformedPersistedData,
            CommerceError::ProductNotFound(_)
            | CommerceError::InvalidVariant { .. }
            | CommerceError::InvalidQuantity(_)
            | CommerceError::InvalidQuantityInput(_)
            | CommerceError::InvalidPrice(_)
            | CommerceError::EmptyCart
            | CommerceError::Overflow => ErrorKind::InvalidOperation,
        }
    }

    /// Whether the store recovers from this error on its own.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::InvalidOperation
    }
}

impl From<StorageError> for CommerceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Serialize(e) => CommerceError::MalformedPersistedData(e.to_string()),
            other => CommerceError::StorageUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_kinds() {
        let unavailable: CommerceError = StorageError::Unavailable("off".to_string()).into();
        assert_eq!(unavailable.kind(), ErrorKind::StorageUnavailable);

        let full: CommerceError = StorageError::QuotaExceeded {
            key: "k".to_string(),
            needed: 10,
            available: 5,
        }
        .into();
        assert_eq!(full.kind(), ErrorKind::StorageUnavailable);

        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let malformed: CommerceError = StorageError::Serialize(parse).into();
        assert_eq!(malformed.kind(), ErrorKind::MalformedPersistedData);
        assert!(malformed.is_recoverable());
    }

    #[test]
    fn test_caller_errors_are_not_recoverable() {
        assert!(!CommerceError::InvalidQuantity(0).is_recoverable());
        assert!(!CommerceError::EmptyCart.is_recoverable());
        assert_eq!(CommerceError::Overflow.kind(), ErrorKind::InvalidOperation);
    }
}
