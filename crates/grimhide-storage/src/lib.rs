//! Browser local storage boundary for the GrimHide storefront.
//!
//! Everything the storefront persists goes through the [`WebStorage`] trait:
//! a synchronous string key-value area shaped like `window.localStorage`.
//! [`Cache`] layers JSON serialization on top, and [`MemoryOrigin`] provides
//! an in-memory origin whose tabs see each other's writes as
//! [`StorageEvent`]s.
//!
//! # Example
//!
//! ```rust
//! use grimhide_storage::{Cache, MemoryOrigin, WebStorage};
//!
//! let origin = MemoryOrigin::new();
//! let tab_a = origin.open_tab();
//! let tab_b = origin.open_tab();
//!
//! let cache = Cache::new(&tab_a);
//! cache.set("greeting", "hello").unwrap();
//!
//! assert_eq!(tab_b.get_item("greeting").unwrap().as_deref(), Some("\"hello\""));
//! assert_eq!(tab_b.drain_events().len(), 1);
//! ```

mod error;
mod kv;
mod memory;
mod web;

pub use error::StorageError;
pub use kv::Cache;
pub use memory::{MemoryOrigin, TabId, TabStorage};
pub use web::{StorageEvent, WebStorage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, MemoryOrigin, StorageError, StorageEvent, TabStorage, WebStorage};
}
