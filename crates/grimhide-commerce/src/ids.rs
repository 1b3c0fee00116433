//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing a ProductId where a LineId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::Variant;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifies a product in the catalog.
    ProductId
);
define_id!(
    /// Identifies one line of the cart: a product plus its variant.
    LineId
);

impl LineId {
    /// Derive the line id for a product and variant.
    ///
    /// A color + size variant gives the product id followed by the color
    /// and the size, joined with `-`. Any other variant spells out each
    /// attribute as `-name=value` in name order, and a line without
    /// attributes is just the product id. `%`, `-` and `=` inside ids, names
    /// and values are percent-escaped, so distinct product + variant pairs
    /// never share an id.
    ///
    /// ```
    /// use grimhide_commerce::cart::Variant;
    /// use grimhide_commerce::ids::{LineId, ProductId};
    ///
    /// let variant = Variant::new().with("size", "M").with("color", "Black");
    /// let id = LineId::for_product(&ProductId::new("p1"), &variant);
    /// assert_eq!(id.as_str(), "p1-Black-M");
    ///
    /// let id = LineId::for_product(&ProductId::new("p1"), &Variant::new().with("size", "M"));
    /// assert_eq!(id.as_str(), "p1-size=M");
    /// ```
    pub fn for_product(product_id: &ProductId, variant: &Variant) -> Self {
        let mut id = String::new();
        push_escaped(&mut id, product_id.as_str());

        match (variant.color(), variant.size()) {
            (Some(color), Some(size)) if variant.len() == 2 => {
                for value in [color, size] {
                    id.push('-');
                    push_escaped(&mut id, value);
                }
            }
            _ => {
                for (name, value) in variant.iter() {
                    id.push('-');
                    push_escaped(&mut id, name);
                    id.push('=');
                    push_escaped(&mut id, value);
                }
            }
        }
        Self(id)
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '%' => out.push_str("%25"),
            '-' => out.push_str("%2D"),
            '=' => out.push_str("%3D"),
            c => out.push(c),
        }
    }
}
