//! Listing query builder.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::browse::filter::{normalize, score};
use crate::browse::Filter;
use crate::catalog::{Catalog, Product};

/// Sort options for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Best search score first; ties keep catalog order.
    #[default]
    Popular,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
}

impl SortOption {
    /// Parse the listing's sort select value. Unknown values sort by
    /// popularity.
    pub fn from_select_value(value: &str) -> Self {
        match value {
            "lh" => SortOption::PriceAsc,
            "hl" => SortOption::PriceDesc,
            "az" => SortOption::NameAsc,
            "za" => SortOption::NameDesc,
            _ => SortOption::Popular,
        }
    }

    pub fn select_value(&self) -> &'static str {
        match self {
            SortOption::Popular => "pop",
            SortOption::PriceAsc => "lh",
            SortOption::PriceDesc => "hl",
            SortOption::NameAsc => "az",
            SortOption::NameDesc => "za",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Popular => "Most Popular",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
            SortOption::NameDesc => "Name: Z-A",
        }
    }

    fn compare(&self, a: &Hit<'_>, b: &Hit<'_>) -> Ordering {
        match self {
            SortOption::Popular => b.score.cmp(&a.score),
            SortOption::PriceAsc => a.product.base_price.cmp(&b.product.base_price),
            SortOption::PriceDesc => b.product.base_price.cmp(&a.product.base_price),
            SortOption::NameAsc => a.normalized_name.cmp(&b.normalized_name),
            SortOption::NameDesc => b.normalized_name.cmp(&a.normalized_name),
        }
    }
}

/// A visible product and its search score.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    pub product: &'a Product,
    pub score: i64,
    normalized_name: String,
}

/// A listing query: search term, filters and sort.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BrowseQuery {
    /// Search text as typed.
    pub term: String,
    /// Filters to apply.
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
}

impl BrowseQuery {
    /// Create an empty query: everything, most popular first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Restrict to a category chip.
    pub fn with_category(self, slug: impl Into<String>) -> Self {
        self.with_filter(Filter::category(slug))
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Run the query against a catalog.
    pub fn run<'a, C: Catalog + ?Sized>(&self, catalog: &'a C) -> Vec<Hit<'a>> {
        let term = normalize(&self.term);
        let mut hits: Vec<Hit<'a>> = catalog
            .products()
            .iter()
            .filter(|p| self.filters.iter().all(|f| f.matches(p)))
            .filter_map(|product| {
                let normalized_name = normalize(&product.name);
                let score = score(&normalized_name, &term);
                (score > 0).then_some(Hit {
                    product,
                    score,
                    normalized_name,
                })
            })
            .collect();

        hits.sort_by(|a, b| self.sort.compare(a, b));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn ids(hits: &[Hit<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.product.id.to_string()).collect()
    }

    #[test]
    fn test_select_values() {
        assert_eq!(SortOption::from_select_value("lh"), SortOption::PriceAsc);
        assert_eq!(SortOption::from_select_value("za"), SortOption::NameDesc);
        assert_eq!(SortOption::from_select_value("pop"), SortOption::Popular);
        assert_eq!(SortOption::from_select_value("bogus"), SortOption::Popular);
        assert_eq!(SortOption::NameAsc.select_value(), "az");
    }

    #[test]
    fn test_empty_query_lists_everything_in_order() {
        let catalog = StaticCatalog::grimhide();
        let hits = BrowseQuery::new().run(&catalog);
        assert_eq!(ids(&hits), vec!["p1", "p2", "p3", "p4", "p5"]);
        assert!(hits.iter().all(|h| h.score == 50));
    }

    #[test]
    fn test_search_ranks_by_position() {
        let catalog = StaticCatalog::grimhide();
        let hits = BrowseQuery::new().with_term("  KNIGHT ").run(&catalog);
        assert_eq!(ids(&hits), vec!["p4"]);
        assert_eq!(hits[0].score, 100);

        let hits = BrowseQuery::new().with_term("armor").run(&catalog);
        assert_eq!(hits.len(), 5);
        // "ranger armor" and "knight armor" tie at 93; catalog order breaks the tie.
        assert_eq!(ids(&hits), vec!["p2", "p4", "p1", "p5", "p3"]);
    }

    #[test]
    fn test_sorts() {
        let catalog = StaticCatalog::grimhide();
        let by_price = BrowseQuery::new().with_sort(SortOption::PriceAsc).run(&catalog);
        assert_eq!(ids(&by_price), vec!["p2", "p1", "p3", "p5", "p4"]);

        let by_price = BrowseQuery::new().with_sort(SortOption::PriceDesc).run(&catalog);
        assert_eq!(ids(&by_price), vec!["p4", "p5", "p3", "p1", "p2"]);

        let by_name = BrowseQuery::new().with_sort(SortOption::NameAsc).run(&catalog);
        assert_eq!(ids(&by_name), vec!["p3", "p4", "p5", "p2", "p1"]);

        let by_name = BrowseQuery::new().with_sort(SortOption::NameDesc).run(&catalog);
        assert_eq!(ids(&by_name), vec!["p1", "p2", "p5", "p4", "p3"]);
    }

    #[test]
    fn test_category_and_term_combine() {
        let catalog = StaticCatalog::grimhide();
        let hits = BrowseQuery::new()
            .with_category("light")
            .with_term("armor")
            .with_sort(SortOption::PriceDesc)
            .run(&catalog);
        assert_eq!(ids(&hits), vec!["p3", "p2"]);

        let hits = BrowseQuery::new().with_category("heavy").with_term("ranger").run(&catalog);
        assert!(hits.is_empty());
    }
}
