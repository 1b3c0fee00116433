//! Storefront domain logic for GrimHide.
//!
//! This crate owns everything the storefront pages share:
//!
//! - **Cart**: the [`CartStore`](cart::CartStore), persisted to browser
//!   storage and kept in sync across tabs
//! - **Catalog**: products, variant options and the shipped armor line
//! - **Browse**: listing search, category chips and sorts
//! - **Checkout**: add-to-cart, buy-now and the checkout gate
//!
//! # Example
//!
//! ```rust
//! use grimhide_commerce::prelude::*;
//! use grimhide_storage::MemoryOrigin;
//!
//! let origin = MemoryOrigin::new();
//! let catalog = StaticCatalog::grimhide();
//! let mut cart = CartStore::open(origin.open_tab());
//!
//! add_product(&mut cart, &catalog, &ProductId::new("p1"), &Variant::new(), 1).unwrap();
//!
//! let pricing = cart.pricing();
//! assert_eq!(pricing.subtotal.display(), "$299.00");
//! assert_eq!(pricing.total.display(), "$322.92");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod browse;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Cart
    pub use crate::cart::{
        CartChange, CartLine, CartPricing, CartStore, ChangeSource, DisplayFields, ListenerId,
        PricingPolicy, Variant, DEFAULT_CART_KEY,
    };

    // Catalog
    pub use crate::catalog::{Catalog, Product, StaticCatalog, VariantOptions};

    // Browse
    pub use crate::browse::{BrowseQuery, Filter, Hit, SortOption};

    // Checkout
    pub use crate::checkout::{
        add_product, buy_now, complete_checkout, parse_quantity_input, proceed_to_checkout,
        CheckoutDecision, CheckoutReceipt, Redirect,
    };

    // Config
    pub use crate::config::{CartConfig, CheckoutConfig, ConfigError, StorefrontConfig};
}
