//! Product and variant option types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cart::{DisplayFields, Variant};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// Color and size choices a product is offered in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantOptions {
    /// Offered colors, first is the default.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Offered sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
}

impl VariantOptions {
    /// Values offered for `attribute`, if the product has that attribute.
    pub fn values_for(&self, attribute: &str) -> Option<&[String]> {
        let values = match attribute {
            Variant::COLOR => &self.colors,
            Variant::SIZE => &self.sizes,
            _ => return None,
        };
        (!values.is_empty()).then_some(values.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.sizes.is_empty()
    }
}

/// A product in the catalog.
///
/// Field names follow the catalog document layout (`basePrice`,
/// `originalPrice`, prices as dollar numbers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Listing category, matched by the category chips.
    #[serde(default)]
    pub category: String,
    /// Selling price.
    #[serde(with = "crate::money::dollars")]
    pub base_price: Money,
    /// Price before discount, shown struck through.
    #[serde(default, with = "optional_dollars", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Primary image URL.
    pub image: String,
    /// Gallery images.
    #[serde(default)]
    pub images: Vec<String>,
    /// Bullet-point features.
    #[serde(default)]
    pub features: Vec<String>,
    /// Specification table.
    #[serde(default)]
    pub specs: BTreeMap<String, String>,
    /// Offered variants.
    #[serde(default)]
    pub variants: VariantOptions,
}

impl Product {
    /// Default color when the shopper has not picked one.
    pub const DEFAULT_COLOR: &'static str = "Black";
    /// Default size when the shopper has not picked one.
    pub const DEFAULT_SIZE: &'static str = "M";

    /// Create a product with a price and image; everything else empty.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        base_price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            base_price,
            original_price: None,
            description: String::new(),
            image: image.into(),
            images: Vec::new(),
            features: Vec::new(),
            specs: BTreeMap::new(),
            variants: VariantOptions::default(),
        }
    }

    /// Percent off the original price, rounded to the nearest whole percent.
    ///
    /// `None` unless there is an original price above the base price.
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?.amount_cents;
        let base = self.base_price.amount_cents;
        if original <= base || original <= 0 {
            return None;
        }
        let saved = i128::from(original - base) * 100;
        let original = i128::from(original);
        let percent = (saved * 2 + original) / (original * 2);
        u32::try_from(percent).ok()
    }

    /// The variant a shopper gets without choosing anything.
    pub fn default_variant(&self) -> Variant {
        let mut variant = Variant::new();
        if let Some(colors) = self.variants.values_for(Variant::COLOR) {
            variant = variant.with(Variant::COLOR, pick_default(colors, Self::DEFAULT_COLOR));
        }
        if let Some(sizes) = self.variants.values_for(Variant::SIZE) {
            variant = variant.with(Variant::SIZE, pick_default(sizes, Self::DEFAULT_SIZE));
        }
        variant
    }

    /// Complete a shopper's selection against this product.
    ///
    /// Missing attributes come from [`Product::default_variant`]. A value the
    /// product does not offer, or an attribute it does not have, is rejected.
    pub fn resolve_variant(&self, selection: &Variant) -> Result<Variant, CommerceError> {
        let mut resolved = self.default_variant();
        for (attribute, value) in selection.iter() {
            let offered = self.variants.values_for(attribute).unwrap_or(&[]);
            if !offered.iter().any(|v| v == value) {
                return Err(CommerceError::InvalidVariant {
                    product_id: self.id.to_string(),
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                });
            }
            resolved = resolved.with(attribute, value);
        }
        Ok(resolved)
    }

    /// Name and image snapshotted onto a cart line.
    pub fn display_fields(&self) -> DisplayFields {
        DisplayFields::new(self.name.clone(), self.image.clone())
    }
}

fn pick_default<'a>(values: &'a [String], preferred: &'a str) -> &'a str {
    values
        .iter()
        .find(|v| v.as_str() == preferred)
        .or_else(|| values.first())
        .map(String::as_str)
        .unwrap_or(preferred)
}

mod optional_dollars {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::money::Money;

    pub fn serialize<S: Serializer>(money: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        match money {
            Some(money) => crate::money::dollars::serialize(money, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "crate::money::dollars")] Money);

        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(m)| m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor() -> Product {
        let mut product = Product::new("p1", "Warrior Armor", Money::from_cents(29900), "front.avif");
        product.original_price = Some(Money::from_cents(34900));
        product.variants = VariantOptions {
            colors: vec!["Black".into(), "Brown".into()],
            sizes: vec!["S".into(), "M".into(), "L".into(), "XL".into()],
        };
        product
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(armor().discount_percent(), Some(14));

        let mut product = armor();
        product.original_price = Some(Money::from_cents(29900));
        assert_eq!(product.discount_percent(), None);

        product.original_price = None;
        assert_eq!(product.discount_percent(), None);
    }

    #[test]
    fn test_default_variant() {
        assert_eq!(armor().default_variant(), Variant::color_size("Black", "M"));

        let mut product = armor();
        product.variants.sizes = vec!["L".into()];
        assert_eq!(product.default_variant(), Variant::color_size("Black", "L"));

        product.variants = VariantOptions::default();
        assert!(product.default_variant().is_empty());
    }

    #[test]
    fn test_resolve_fills_missing_attributes() {
        let resolved = armor()
            .resolve_variant(&Variant::new().with(Variant::SIZE, "XL"))
            .unwrap();
        assert_eq!(resolved, Variant::color_size("Black", "XL"));
    }

    #[test]
    fn test_resolve_rejects_unknown_values() {
        let err = armor()
            .resolve_variant(&Variant::new().with(Variant::COLOR, "Pink"))
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidVariant { ref attribute, .. } if attribute == "color"));

        let err = armor()
            .resolve_variant(&Variant::new().with("material", "steel"))
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidVariant { .. }));
    }

    #[test]
    fn test_document_layout() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "p9",
                "name": "Scout Vest",
                "basePrice": 99.5,
                "originalPrice": 120,
                "image": "/images/p9.webp",
                "variants": {"colors": ["Brown"], "sizes": ["M"]}
            }"#,
        )
        .unwrap();
        assert_eq!(product.base_price.amount_cents, 9950);
        assert_eq!(product.original_price, Some(Money::from_cents(12000)));
        assert_eq!(product.discount_percent(), Some(17));
        assert_eq!(product.default_variant(), Variant::color_size("Brown", "M"));
        assert!(product.features.is_empty());
    }
}
