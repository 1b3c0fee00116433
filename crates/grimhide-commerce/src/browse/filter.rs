//! Listing filters.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::money::Money;

/// Chip value that shows every category.
pub const ALL_CATEGORIES: &str = "all";

/// A listing filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Filter {
    /// Only products in this category; `"all"` matches everything.
    Category(String),
    /// Only products priced within the range, both ends inclusive.
    PriceRange {
        min: Option<Money>,
        max: Option<Money>,
    },
}

impl Filter {
    /// Create a category filter.
    pub fn category(slug: impl Into<String>) -> Self {
        Filter::Category(slug.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Money>, max: Option<Money>) -> Self {
        Filter::PriceRange { min, max }
    }

    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Category(slug) => slug == ALL_CATEGORIES || product.category == *slug,
            Filter::PriceRange { min, max } => {
                let price = product.base_price;
                min.map_or(true, |min| price >= min) && max.map_or(true, |max| price <= max)
            }
        }
    }
}

/// Normalize text for matching: trimmed and lowercased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Relevance of `name` for the search `term`, both already normalized.
///
/// A hit scores `100 - position` of the term in the name, an empty term
/// scores 50 for every product, and a miss scores 0. Products scoring 0 or
/// less are hidden.
pub fn score(name: &str, term: &str) -> i64 {
    if term.is_empty() {
        return 50;
    }
    match name.find(term) {
        Some(byte_pos) => {
            let position = name[..byte_pos].chars().count();
            100 - i64::try_from(position).unwrap_or(i64::MAX - 100)
        }
        None => 0,
    }
}
