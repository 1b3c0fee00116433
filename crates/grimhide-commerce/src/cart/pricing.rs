//! Cart pricing calculations.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Tax and shipping rules applied to a cart subtotal.
///
/// Defaults: flat 8% tax, free shipping from $200.00, $15.00 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    /// Tax rate in basis points (800 = 8%).
    pub tax_rate_bps: u32,
    /// Subtotal at or above which shipping is free, in cents.
    pub free_shipping_threshold_cents: i64,
    /// Shipping charged below the threshold, in cents.
    pub flat_shipping_cents: i64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate_bps: 800,
            free_shipping_threshold_cents: 20_000,
            flat_shipping_cents: 1_500,
        }
    }
}

impl PricingPolicy {
    /// Tax on `subtotal`, rounded half-up to the cent.
    pub fn tax(&self, subtotal: Money) -> Money {
        subtotal.basis_points(self.tax_rate_bps)
    }

    /// Shipping for a cart with `subtotal`. An empty cart ships nothing.
    pub fn shipping(&self, subtotal: Money, item_count: u64) -> Money {
        if item_count == 0 || subtotal.amount_cents >= self.free_shipping_threshold_cents {
            Money::zero()
        } else {
            Money::from_cents(self.flat_shipping_cents)
        }
    }

    /// Price a cart from its subtotal and counts.
    pub fn quote(&self, subtotal: Money, item_count: u64, unique_items: usize) -> CartPricing {
        let tax = self.tax(subtotal);
        let shipping = self.shipping(subtotal, item_count);
        CartPricing {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
            item_count,
            unique_items,
        }
    }
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartPricing {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Tax amount.
    pub tax: Money,
    /// Shipping cost.
    pub shipping: Money,
    /// Final total (subtotal + tax + shipping).
    pub total: Money,
    /// Sum of quantities.
    pub item_count: u64,
    /// Number of distinct lines.
    pub unique_items: usize,
}

impl CartPricing {
    /// Whether this cart qualifies for free shipping.
    pub fn ships_free(&self) -> bool {
        self.item_count > 0 && self.shipping.is_zero()
    }
}
