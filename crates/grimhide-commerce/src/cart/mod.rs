//! Shopping cart module.
//!
//! Contains the cart store, cart lines, change notification and pricing.

mod line;
mod listener;
mod pricing;
mod store;

pub use line::{CartLine, DisplayFields, Variant};
pub use listener::{CartChange, ChangeSource, ListenerId};
pub use pricing::{CartPricing, PricingPolicy};
pub use store::{CartStore, DEFAULT_CART_KEY};
