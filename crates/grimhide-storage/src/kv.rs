//! Typed JSON wrapper over a storage area.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::web::WebStorage;
use crate::StorageError;

/// Type-safe cache over a [`WebStorage`] area.
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug)]
pub struct Cache<S> {
    store: S,
}

impl<S: WebStorage> Cache<S> {
    /// Wrap a storage area.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped storage area.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist, and
    /// [`StorageError::Serialize`] if the stored text is not a `T`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let lines: Option<Vec<CartLine>> = cache.get("grimhide_cart_v1")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key)? {
            Some(text) => {
                let value: T = serde_json::from_str(&text)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Get the raw stored text.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.store.get_item(key)
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("grimhide_cart_v1", &lines)?;
    /// ```
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        debug!(key, bytes = text.len(), "storage write");
        self.store.set_item(key, &text)
    }

    /// Set raw text.
    pub fn set_raw(&self, key: &str, text: &str) -> Result<(), StorageError> {
        self.store.set_item(key, text)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove_item(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.store.get_item(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryOrigin;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        count: u32,
    }

    #[test]
    fn test_set_then_get() {
        let origin = MemoryOrigin::new();
        let cache = Cache::new(origin.open_tab());
        let prefs = Prefs {
            theme: "dark".to_string(),
            count: 3,
        };

        cache.set("prefs", &prefs).unwrap();
        assert_eq!(cache.get::<Prefs>("prefs").unwrap(), Some(prefs));
        assert!(cache.exists("prefs").unwrap());
    }

    #[test]
    fn test_missing_key_is_none() {
        let origin = MemoryOrigin::new();
        let cache = Cache::new(origin.open_tab());
        assert_eq!(cache.get::<Prefs>("nope").unwrap(), None);
        assert!(!cache.exists("nope").unwrap());
    }

    #[test]
    fn test_wrong_shape_is_serialize_error() {
        let origin = MemoryOrigin::new();
        origin.seed("prefs", "42");
        let cache = Cache::new(origin.open_tab());

        let err = cache.get::<Prefs>("prefs").unwrap_err();
        assert!(matches!(err, StorageError::Serialize(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_delete() {
        let origin = MemoryOrigin::new();
        let cache = Cache::new(origin.open_tab());
        cache.set_raw("k", "\"v\"").unwrap();
        cache.delete("k").unwrap();
        assert_eq!(cache.get_raw("k").unwrap(), None);
    }
}
