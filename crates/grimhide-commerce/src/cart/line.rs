//! Cart line and variant types.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{LineId, ProductId};
use crate::money::Money;

/// A selected combination of product attributes, e.g. color and size.
///
/// Attributes are kept sorted by name so that iteration order, and with it
/// the derived [`LineId`], does not depend on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variant(BTreeMap<String, String>);

impl Variant {
    /// Attribute name for the color option.
    pub const COLOR: &'static str = "color";
    /// Attribute name for the size option.
    pub const SIZE: &'static str = "size";

    /// An empty variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Shorthand for a color + size variant.
    pub fn color_size(color: impl Into<String>, size: impl Into<String>) -> Self {
        Self::new().with(Self::COLOR, color).with(Self::SIZE, size)
    }

    /// Look up an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn color(&self) -> Option<&str> {
        self.get(Self::COLOR)
    }

    pub fn size(&self) -> Option<&str> {
        self.get(Self::SIZE)
    }

    /// Attribute values in attribute name order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human label such as `"Black | M"`.
    pub fn label(&self) -> String {
        self.values().collect::<Vec<_>>().join(" | ")
    }
}

/// Display fields captured when a line is first added.
///
/// The cart never goes back to the catalog to render a line, so these must
/// be supplied by the caller at add time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayFields {
    /// Product name.
    pub name: String,
    /// Image URL for thumbnails.
    pub image_url: String,
}

impl DisplayFields {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

/// One product + variant entry in the cart.
///
/// The serialized form is the persisted cart layout shared by every page:
/// camelCase field names, `unitPrice` as a dollar number, and `variant`
/// omitted when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Deterministic id derived from product and variant.
    pub line_id: LineId,
    /// Product this line was added from.
    pub product_id: ProductId,
    /// Product name at add time.
    pub name: String,
    /// Product image at add time.
    pub image_url: String,
    /// Unit price at add time.
    #[serde(with = "crate::money::dollars")]
    pub unit_price: Money,
    /// Quantity, always at least 1 while the line exists.
    pub quantity: u32,
    /// Selected variant attributes.
    #[serde(
        default,
        skip_serializing_if = "Variant::is_empty",
        deserialize_with = "variant_or_null"
    )]
    pub variant: Variant,
}

impl CartLine {
    /// Create a line for `product_id` + `variant`.
    pub fn new(
        product_id: ProductId,
        variant: Variant,
        unit_price: Money,
        quantity: u32,
        display: DisplayFields,
    ) -> Self {
        Self {
            line_id: LineId::for_product(&product_id, &variant),
            product_id,
            name: display.name,
            image_url: display.image_url,
            unit_price,
            quantity,
            variant,
        }
    }

    /// `unit_price * quantity`, or `None` on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

fn variant_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Variant, D::Error> {
    Ok(Option::<Variant>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_m_line() -> CartLine {
        CartLine::new(
            ProductId::new("p1"),
            Variant::color_size("Black", "M"),
            Money::from_cents(29900),
            2,
            DisplayFields::new("Warrior Armor", "/images/product1/front.avif"),
        )
    }

    #[test]
    fn test_variant_accessors() {
        let variant = Variant::color_size("Brown", "XL");
        assert_eq!(variant.color(), Some("Brown"));
        assert_eq!(variant.size(), Some("XL"));
        assert_eq!(variant.label(), "Brown | XL");
        assert_eq!(variant.get("material"), None);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(black_m_line().line_total(), Some(Money::from_cents(59800)));
    }

    #[test]
    fn test_persisted_layout() {
        let json = serde_json::to_value(black_m_line()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lineId": "p1-Black-M",
                "productId": "p1",
                "name": "Warrior Armor",
                "imageUrl": "/images/product1/front.avif",
                "unitPrice": 299.0,
                "quantity": 2,
                "variant": {"color": "Black", "size": "M"}
            })
        );
    }

    #[test]
    fn test_empty_variant_is_omitted() {
        let line = CartLine::new(
            ProductId::new("gift"),
            Variant::new(),
            Money::from_cents(2500),
            1,
            DisplayFields::new("Gift Card", ""),
        );
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("variant").is_none());

        let back: CartLine = serde_json::from_value(json).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_null_variant_reads_as_empty() {
        let line: CartLine = serde_json::from_str(
            r#"{"lineId":"p1","productId":"p1","name":"A","imageUrl":"","unitPrice":1.5,"quantity":1,"variant":null}"#,
        )
        .unwrap();
        assert!(line.variant.is_empty());
        assert_eq!(line.unit_price.amount_cents, 150);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result = serde_json::from_str::<CartLine>(
            r#"{"lineId":"p1","productId":"p1","imageUrl":"","unitPrice":1.5,"quantity":1}"#,
        );
        assert!(result.is_err());
    }
}
