//! In-memory storage origin shared by simulated tabs.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::web::{StorageEvent, WebStorage};
use crate::StorageError;

/// Identifies one tab (browsing context) of an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct OriginState {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    disabled: bool,
    next_tab: u64,
    inboxes: BTreeMap<TabId, VecDeque<StorageEvent>>,
}

impl OriginState {
    fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    fn check_enabled(&self) -> Result<(), StorageError> {
        if self.disabled {
            Err(StorageError::Unavailable("storage is disabled".to_string()))
        } else {
            Ok(())
        }
    }

    /// Queue `event` for every tab except `writer`.
    fn broadcast(&mut self, writer: TabId, event: StorageEvent) {
        for (tab, inbox) in self.inboxes.iter_mut() {
            if *tab != writer {
                inbox.push_back(event.clone());
            }
        }
    }
}

/// One storage origin (scheme + host + port) held in memory.
///
/// Every tab opened on the origin sees the same entries. A write through one
/// tab queues a [`StorageEvent`] for each other open tab, the way browsers
/// fire `storage` events in every other window of the origin but never in
/// the writer. Quota and a disable switch let tests reproduce full or
/// blocked storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrigin {
    state: Rc<RefCell<OriginState>>,
}

impl MemoryOrigin {
    /// Create an empty origin without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty origin that holds at most `bytes` of keys and values.
    pub fn with_quota(bytes: usize) -> Self {
        let origin = Self::new();
        origin.state.borrow_mut().quota_bytes = Some(bytes);
        origin
    }

    /// Open a new tab on this origin.
    pub fn open_tab(&self) -> TabStorage {
        let mut state = self.state.borrow_mut();
        let id = TabId(state.next_tab);
        state.next_tab += 1;
        state.inboxes.insert(id, VecDeque::new());
        TabStorage {
            id,
            state: Rc::clone(&self.state),
        }
    }

    /// Enable or disable the whole storage area.
    pub fn set_disabled(&self, disabled: bool) {
        self.state.borrow_mut().disabled = disabled;
    }

    /// Change the quota; `None` removes it.
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.state.borrow_mut().quota_bytes = bytes;
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.state.borrow().used_bytes()
    }

    /// Read a value directly, bypassing tabs and the disable switch.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.state.borrow().entries.get(key).cloned()
    }

    /// Write a value directly without notifying any tab.
    ///
    /// Used to seed storage as a previous session would have left it.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state
            .borrow_mut()
            .entries
            .insert(key.into(), value.into());
    }
}

/// A tab's handle onto a [`MemoryOrigin`].
#[derive(Debug)]
pub struct TabStorage {
    id: TabId,
    state: Rc<RefCell<OriginState>>,
}

impl TabStorage {
    /// This tab's id.
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Take the storage events other tabs produced since the last call.
    ///
    /// The host event loop forwards each of these to its listeners.
    pub fn drain_events(&self) -> Vec<StorageEvent> {
        let mut state = self.state.borrow_mut();
        state
            .inboxes
            .get_mut(&self.id)
            .map(|inbox| inbox.drain(..).collect())
            .unwrap_or_default()
    }

    /// Remove every key of the origin.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.check_enabled()?;
        if state.entries.is_empty() {
            return Ok(());
        }
        state.entries.clear();
        state.broadcast(
            self.id,
            StorageEvent {
                key: None,
                old_value: None,
                new_value: None,
            },
        );
        Ok(())
    }
}

impl WebStorage for TabStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let state = self.state.borrow();
        state.check_enabled()?;
        Ok(state.entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.check_enabled()?;

        let old_value = state.entries.get(key).cloned();
        if old_value.as_deref() == Some(value) {
            return Ok(());
        }

        if let Some(quota) = state.quota_bytes {
            let old_size = old_value.as_ref().map_or(0, |v| key.len() + v.len());
            let others = state.used_bytes() - old_size;
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    available: quota.saturating_sub(others),
                });
            }
        }

        state.entries.insert(key.to_string(), value.to_string());
        state.broadcast(
            self.id,
            StorageEvent {
                key: Some(key.to_string()),
                old_value,
                new_value: Some(value.to_string()),
            },
        );
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut state = self.state.borrow_mut();
        state.check_enabled()?;
        if let Some(old_value) = state.entries.remove(key) {
            state.broadcast(
                self.id,
                StorageEvent {
                    key: Some(key.to_string()),
                    old_value: Some(old_value),
                    new_value: None,
                },
            );
        }
        Ok(())
    }
}

impl Drop for TabStorage {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.inboxes.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_share_entries() {
        let origin = MemoryOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();

        a.set_item("cart", "[]").unwrap();
        assert_eq!(b.get_item("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_writer_does_not_receive_own_event() {
        let origin = MemoryOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();

        a.set_item("cart", "[1]").unwrap();

        assert!(a.drain_events().is_empty());
        let events = b.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].key.as_deref(), Some("cart"));
        assert_eq!(events[0].old_value, None);
        assert_eq!(events[0].new_value.as_deref(), Some("[1]"));
        assert!(b.drain_events().is_empty());
    }

    #[test]
    fn test_unchanged_value_fires_nothing() {
        let origin = MemoryOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();

        a.set_item("k", "v").unwrap();
        b.drain_events();
        a.set_item("k", "v").unwrap();
        assert!(b.drain_events().is_empty());
    }

    #[test]
    fn test_remove_and_clear_events() {
        let origin = MemoryOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();

        a.set_item("k", "v").unwrap();
        a.remove_item("k").unwrap();
        a.remove_item("missing").unwrap();
        a.set_item("x", "y").unwrap();
        a.clear().unwrap();

        let events = b.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].new_value, None);
        assert_eq!(events[1].old_value.as_deref(), Some("v"));
        assert_eq!(events[3].key, None);
        assert_eq!(origin.used_bytes(), 0);
    }

    #[test]
    fn test_quota_exceeded_keeps_old_value() {
        let origin = MemoryOrigin::with_quota(10);
        let tab = origin.open_tab();

        tab.set_item("k", "abc").unwrap();
        let err = tab.set_item("k", "abcdefghijklmnop").unwrap_err();
        assert!(matches!(
            err,
            StorageError::QuotaExceeded { needed: 17, available: 10, .. }
        ));
        assert_eq!(tab.get_item("k").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_disabled_storage() {
        let origin = MemoryOrigin::new();
        let tab = origin.open_tab();
        origin.set_disabled(true);

        assert!(tab.get_item("k").unwrap_err().is_unavailable());
        assert!(tab.set_item("k", "v").unwrap_err().is_unavailable());

        origin.set_disabled(false);
        tab.set_item("k", "v").unwrap();
    }

    #[test]
    fn test_closed_tab_stops_receiving() {
        let origin = MemoryOrigin::new();
        let a = origin.open_tab();
        let b = origin.open_tab();
        let b_id = b.id();
        drop(b);

        a.set_item("k", "v").unwrap();
        assert!(!origin.state.borrow().inboxes.contains_key(&b_id));
    }

    #[test]
    fn test_seed_is_silent() {
        let origin = MemoryOrigin::new();
        let tab = origin.open_tab();
        origin.seed("cart", "not json");

        assert!(tab.drain_events().is_empty());
        assert_eq!(origin.peek("cart").as_deref(), Some("not json"));
    }
}
