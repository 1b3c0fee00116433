//! Storefront actions and the checkout gate.
//!
//! These are the operations page adapters call: they turn form input and
//! catalog lookups into [`CartStore`] calls and decide where the shopper
//! goes next.

use grimhide_storage::WebStorage;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cart::{CartLine, CartPricing, CartStore, Variant};
use crate::catalog::Catalog;
use crate::config::CheckoutConfig;
use crate::error::CommerceError;
use crate::ids::{LineId, ProductId};

/// How long the simulated checkout takes. Adapters show a spinner for this
/// long; nothing here sleeps.
pub const SIMULATED_CHECKOUT_DELAY_MS: u64 = 2_000;

/// Smallest value the detail page's quantity stepper shows.
pub const MIN_STEPPER_QUANTITY: u32 = 1;
/// Largest value the detail page's quantity stepper shows.
pub const MAX_STEPPER_QUANTITY: u32 = 10;

/// Parse a quantity text field.
///
/// Surrounding whitespace is ignored and an empty field means 1. Anything
/// that is not a positive integer is rejected.
pub fn parse_quantity_input(text: &str) -> Result<u32, CommerceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(1);
    }
    match trimmed.parse::<u32>() {
        Ok(0) | Err(_) => Err(CommerceError::InvalidQuantityInput(text.to_string())),
        Ok(quantity) => Ok(quantity),
    }
}

/// Clamp a stepper value into `1..=10`.
pub fn clamp_stepper(quantity: i64) -> u32 {
    let clamped = quantity.clamp(
        i64::from(MIN_STEPPER_QUANTITY),
        i64::from(MAX_STEPPER_QUANTITY),
    );
    u32::try_from(clamped).unwrap_or(MIN_STEPPER_QUANTITY)
}

/// Where to send the shopper next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Redirect {
    /// The checkout page.
    Checkout,
    /// The login page.
    Login,
}

impl Redirect {
    /// Page path relative to the site root.
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Checkout => "checkout.html",
            Redirect::Login => "login.html",
        }
    }
}

/// Outcome of pressing "Proceed to checkout".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutDecision {
    /// Anonymous visitor; go log in first.
    LoginRequired { redirect: Redirect },
    /// Go to checkout with this summary.
    Proceed {
        redirect: Redirect,
        pricing: CartPricing,
    },
}

impl CheckoutDecision {
    pub fn redirect(&self) -> Redirect {
        match self {
            CheckoutDecision::LoginRequired { redirect } => *redirect,
            CheckoutDecision::Proceed { redirect, .. } => *redirect,
        }
    }
}

/// A completed (simulated) order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Lines that were bought.
    pub lines: Vec<CartLine>,
    /// What was charged.
    pub pricing: CartPricing,
    /// How long the adapter should pretend to process.
    pub simulated_delay_ms: u64,
}

/// Add a catalog product to the cart.
///
/// Missing variant attributes are filled from the product's defaults; the
/// line snapshots the product's current name, image and price.
pub fn add_product<S, C>(
    store: &mut CartStore<S>,
    catalog: &C,
    product_id: &ProductId,
    selection: &Variant,
    quantity: u32,
) -> Result<LineId, CommerceError>
where
    S: WebStorage,
    C: Catalog + ?Sized,
{
    let product = catalog.require(product_id)?;
    let variant = product.resolve_variant(selection)?;
    let line_id = LineId::for_product(&product.id, &variant);

    store.add_item(
        product.id.clone(),
        variant,
        product.base_price,
        quantity,
        product.display_fields(),
    )?;
    Ok(line_id)
}

/// Replace the cart with just this product and head to checkout.
pub fn buy_now<S, C>(
    store: &mut CartStore<S>,
    catalog: &C,
    product_id: &ProductId,
    selection: &Variant,
    quantity: u32,
) -> Result<Redirect, CommerceError>
where
    S: WebStorage,
    C: Catalog + ?Sized,
{
    let product = catalog.require(product_id)?;
    let variant = product.resolve_variant(selection)?;

    store.replace_with(
        product.id.clone(),
        variant,
        product.base_price,
        quantity,
        product.display_fields(),
    )?;
    info!(product_id = %product.id, quantity, "buy now");
    Ok(Redirect::Checkout)
}

/// Decide what "Proceed to checkout" does.
///
/// An empty cart is refused. With `require_login` set, anonymous visitors
/// are sent to log in; everyone else proceeds with the pricing summary.
pub fn proceed_to_checkout<S: WebStorage>(
    store: &CartStore<S>,
    logged_in: bool,
    config: &CheckoutConfig,
) -> Result<CheckoutDecision, CommerceError> {
    if store.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    if config.require_login && !logged_in {
        info!("checkout requires login");
        return Ok(CheckoutDecision::LoginRequired {
            redirect: Redirect::Login,
        });
    }

    let pricing = store.pricing();
    info!(total = %pricing.total, items = pricing.item_count, "proceeding to checkout");
    Ok(CheckoutDecision::Proceed {
        redirect: Redirect::Checkout,
        pricing,
    })
}

/// Place the order. Always succeeds for a non-empty cart, then empties it.
pub fn complete_checkout<S: WebStorage>(
    store: &mut CartStore<S>,
    config: &CheckoutConfig,
) -> Result<CheckoutReceipt, CommerceError> {
    if store.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let receipt = CheckoutReceipt {
        lines: store.lines().to_vec(),
        pricing: store.pricing(),
        simulated_delay_ms: config.simulated_delay_ms,
    };
    store.clear();
    info!(total = %receipt.pricing.total, "order placed");
    Ok(receipt)
}
