//! Product catalog module.
//!
//! Contains the product type, the [`Catalog`] lookup seam and the static
//! catalog the storefront ships with.

mod product;

pub use product::{Product, VariantOptions};

use tracing::debug;

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// Read access to products.
pub trait Catalog {
    /// Look up one product.
    fn product(&self, id: &ProductId) -> Option<&Product>;

    /// All products in listing order.
    fn products(&self) -> &[Product];

    /// Look up a product or fail with [`CommerceError::ProductNotFound`].
    fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.product(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }
}

/// Catalog held in memory, in listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Build a catalog from products. Later duplicates of an id are dropped.
    pub fn new(products: Vec<Product>) -> Self {
        let mut unique: Vec<Product> = Vec::with_capacity(products.len());
        for product in products {
            if unique.iter().any(|p| p.id == product.id) {
                debug!(product_id = %product.id, "dropping duplicate catalog entry");
                continue;
            }
            unique.push(product);
        }
        Self { products: unique }
    }

    /// Load a catalog document: a JSON array of products.
    pub fn from_json(text: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(text)
            .map_err(|e| CommerceError::MalformedPersistedData(e.to_string()))?;
        Ok(Self::new(products))
    }

    /// The GrimHide armor line.
    pub fn grimhide() -> Self {
        Self::new(vec![
            armor(
                "p1",
                "Warrior Armor",
                "heavy",
                (29900, 34900),
                "Premium handcrafted leather armor for protection and agility.",
                &[
                    "/images/product1/front.avif",
                    "/images/product1/chest.avif",
                    "/images/product1/back.avif",
                ],
                &[
                    "Premium full-grain leather construction",
                    "Reinforced stress points",
                    "Adjustable straps for perfect fit",
                ],
                ("Full-grain leather", "2.4 kg", "CE Level 2"),
            ),
            armor(
                "p2",
                "Ranger Armor",
                "light",
                (27900, 32900),
                "Lightweight armor for agility and style.",
                &[
                    "/images/product2/front.webp",
                    "/images/product2/chest.webp",
                    "/images/product2/back.webp",
                ],
                &["Lightweight design", "High mobility", "Weather resistant"],
                ("Premium leather", "1.8 kg", "CE Level 1"),
            ),
            armor(
                "p3",
                "Assassin Armor",
                "light",
                (34900, 39900),
                "Sleek design for stealth and protection.",
                &[
                    "/images/product3/front.avif",
                    "/images/product3/chest.avif",
                    "/images/product3/back.avif",
                ],
                &["Stealth design", "Flexible material", "Concealed pockets"],
                ("Flexible leather", "1.5 kg", "CE Level 1"),
            ),
            armor(
                "p4",
                "Knight Armor",
                "heavy",
                (39900, 44900),
                "Heavy-duty leather armor for true warriors.",
                &["https://images.unsplash.com/photo-1630713814061-4d5e114d88d9?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80"],
                &["Heavy duty construction", "Maximum protection", "Reinforced joints"],
                ("Heavy-duty leather", "3.2 kg", "CE Level 3"),
            ),
            armor(
                "p5",
                "Paladin Armor",
                "heavy",
                (36900, 41900),
                "Divine design with high durability and style.",
                &["https://images.unsplash.com/photo-1617118684470-8d871c853b7b?ixlib=rb-4.0.3&auto=format&fit=crop&w=600&q=80"],
                &["Elegant design", "High durability", "Divine aesthetics"],
                ("Premium leather", "2.8 kg", "CE Level 2"),
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for StaticCatalog {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn products(&self) -> &[Product] {
        &self.products
    }
}

#[allow(clippy::too_many_arguments)]
fn armor(
    id: &str,
    name: &str,
    category: &str,
    (base_cents, original_cents): (i64, i64),
    description: &str,
    images: &[&str],
    features: &[&str],
    (material, weight, protection): (&str, &str, &str),
) -> Product {
    let image = images.first().copied().unwrap_or_default();
    let mut product = Product::new(id, name, Money::from_cents(base_cents), image);
    product.category = category.to_string();
    product.original_price = Some(Money::from_cents(original_cents));
    product.description = description.to_string();
    product.images = images.iter().map(|s| s.to_string()).collect();
    product.features = features.iter().map(|s| s.to_string()).collect();
    product.specs = [
        ("Material", material),
        ("Weight", weight),
        ("Protection Level", protection),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    product.variants = VariantOptions {
        colors: vec!["Black".into(), "Brown".into()],
        sizes: vec!["S".into(), "M".into(), "L".into(), "XL".into()],
    };
    product
}
