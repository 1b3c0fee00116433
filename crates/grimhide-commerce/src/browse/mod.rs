//! Product listing module.
//!
//! Contains search scoring, category and price filters, and listing sorts.

mod filter;
mod query;

pub use filter::{normalize, score, Filter, ALL_CATEGORIES};
pub use query::{BrowseQuery, Hit, SortOption};
