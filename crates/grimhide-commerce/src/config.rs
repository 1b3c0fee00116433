//! Storefront configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{PricingPolicy, DEFAULT_CART_KEY};

/// Errors loading or saving a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML file could not be parsed.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML could not be produced.
    #[error("Failed to write TOML config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON file could not be parsed or produced.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Storefront configuration file.
///
/// Every section and field is optional; defaults reproduce the live store.
///
/// ```toml
/// [cart]
/// storage_key = "grimhide_cart_v1"
///
/// [pricing]
/// tax_rate_bps = 800
/// free_shipping_threshold_cents = 20000
/// flat_shipping_cents = 1500
///
/// [checkout]
/// require_login = true
/// simulated_delay_ms = 2000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Cart persistence.
    #[serde(default)]
    pub cart: CartConfig,

    /// Tax and shipping.
    #[serde(default)]
    pub pricing: PricingPolicy,

    /// Checkout gate.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        tracing::debug!(path = %path.display(), "storefront config loaded");
        Ok(config)
    }

    /// Parse TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse JSON config.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file, choosing the format the same way as [`load`](Self::load).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cart.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cart.storage_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.pricing.free_shipping_threshold_cents < 0 {
            return Err(ConfigError::Invalid {
                field: "pricing.free_shipping_threshold_cents",
                reason: "must not be negative".to_string(),
            });
        }
        if self.pricing.flat_shipping_cents < 0 {
            return Err(ConfigError::Invalid {
                field: "pricing.flat_shipping_cents",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Cart persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage key the cart is written under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_CART_KEY.to_string()
}

/// Checkout gate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Send anonymous visitors to login before checkout.
    #[serde(default = "default_true")]
    pub require_login: bool,

    /// How long the simulated checkout spinner runs.
    #[serde(default = "default_delay_ms")]
    pub simulated_delay_ms: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            require_login: true,
            simulated_delay_ms: default_delay_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    crate::checkout::SIMULATED_CHECKOUT_DELAY_MS
}
