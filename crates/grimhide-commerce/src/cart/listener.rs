//! Change notification for cart subscribers.

use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::ids::LineId;

/// Handle returned by [`crate::cart::CartStore::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What changed the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSource {
    /// A line was added or its quantity grew through an add.
    Added(LineId),
    /// A line's quantity was set or adjusted.
    QuantityChanged(LineId),
    /// A line was removed, directly or by dropping to zero.
    Removed(LineId),
    /// The cart was emptied.
    Cleared,
    /// The cart was replaced with a single line (buy now).
    Replaced(LineId),
    /// Another tab wrote the persisted cart.
    External,
}

/// Passed to every listener after the cart changes.
#[derive(Debug)]
pub struct CartChange<'a> {
    /// What caused the change.
    pub source: ChangeSource,
    /// The cart after the change.
    pub lines: &'a [CartLine],
    /// Set when the change could not be written to storage. The cart in
    /// memory is still correct; the write is retried on the next mutation.
    pub storage_warning: Option<&'a CommerceError>,
}

type Callback = Box<dyn FnMut(&CartChange<'_>)>;

/// Registered listeners, called in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < len_before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Call every listener. A panicking listener is logged and skipped; the
    /// rest still run.
    pub(crate) fn dispatch(&mut self, change: &CartChange<'_>) {
        for (id, callback) in self.entries.iter_mut() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(change)));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic".to_string());
                warn!(listener = id.0, %message, "cart listener panicked");
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn change() -> CartChange<'static> {
        CartChange {
            source: ChangeSource::Cleared,
            lines: &[],
            storage_warning: None,
        }
    }

    #[test]
    fn test_dispatch_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        for n in 0..3 {
            let log = Rc::clone(&log);
            listeners.add(Box::new(move |_| log.borrow_mut().push(n)));
        }

        listeners.dispatch(&change());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let hits = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::default();
        listeners.add(Box::new(|_| panic!("render failed")));
        let counter = Rc::clone(&hits);
        listeners.add(Box::new(move |_| *counter.borrow_mut() += 1));

        listeners.dispatch(&change());
        listeners.dispatch(&change());
        assert_eq!(*hits.borrow(), 2);
    }

    #[test]
    fn test_remove() {
        let mut listeners = Listeners::default();
        let id = listeners.add(Box::new(|_| {}));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        assert_eq!(listeners.len(), 0);
    }
}
