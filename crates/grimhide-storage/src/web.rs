//! The string key-value storage boundary.

use std::rc::Rc;

use crate::StorageError;

/// A per-origin string key-value storage area.
///
/// Mirrors the shape of `window.localStorage`: values are strings, reads of
/// a missing key return `None`, and writes are synchronous. A browser host
/// implements this over the real storage object; [`crate::MemoryOrigin`]
/// implements it in memory.
pub trait WebStorage {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: WebStorage + ?Sized> WebStorage for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<T: WebStorage + ?Sized> WebStorage for Rc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// A change to the storage area made by another tab of the same origin.
///
/// `key` is `None` when the whole area was cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The changed key, or `None` for a clear.
    pub key: Option<String>,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change, `None` when removed.
    pub new_value: Option<String>,
}

impl StorageEvent {
    /// Whether this event affects `key`.
    pub fn touches(&self, key: &str) -> bool {
        match &self.key {
            Some(k) => k == key,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_touches_own_key() {
        let event = StorageEvent {
            key: Some("cart".to_string()),
            old_value: None,
            new_value: Some("[]".to_string()),
        };
        assert!(event.touches("cart"));
        assert!(!event.touches("session"));
    }

    #[test]
    fn test_clear_event_touches_every_key() {
        let event = StorageEvent {
            key: None,
            old_value: None,
            new_value: None,
        };
        assert!(event.touches("cart"));
        assert!(event.touches("anything"));
    }
}
