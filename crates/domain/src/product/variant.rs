//! Product variants.

use serde::{Deserialize, Serialize};

use super::{ProductPrice, ProductStock, ValidationError};

/// A purchasable variation of a product (e.g. a size/color combination).
///
/// Variants have no identity of their own: they are values owned by their
/// product, identified only by their position in its variant list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    size: String,
    color: String,
    price: ProductPrice,
    stock: ProductStock,
    image_url: String,
}

impl ProductVariant {
    /// Creates a new variant.
    pub fn new(
        size: impl Into<String>,
        color: impl Into<String>,
        price: ProductPrice,
        stock: ProductStock,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
            price,
            stock,
            image_url: image_url.into(),
        }
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn price(&self) -> ProductPrice {
        self.price
    }

    pub fn stock(&self) -> ProductStock {
        self.stock
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

/// Raw variant data supplied by a caller.
///
/// Size, color and image URL may be omitted and default to empty strings;
/// price and stock are required and validated on conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl VariantInput {
    /// Creates an input with the required fields only.
    pub fn new(price: f64, stock: i64) -> Self {
        Self {
            price,
            stock,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

impl TryFrom<VariantInput> for ProductVariant {
    type Error = ValidationError;

    fn try_from(input: VariantInput) -> Result<Self, Self::Error> {
        Ok(ProductVariant::new(
            input.size.unwrap_or_default(),
            input.color.unwrap_or_default(),
            ProductPrice::new(input.price)?,
            ProductStock::new(input.stock)?,
            input.image_url.unwrap_or_default(),
        ))
    }
}

/// Validates a list of raw variants, preserving order.
pub(crate) fn variants_from_inputs(
    inputs: Vec<VariantInput>,
) -> Result<Vec<ProductVariant>, ValidationError> {
    inputs.into_iter().map(ProductVariant::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let input: VariantInput = serde_json::from_str(r#"{"price": 12.5, "stock": 3}"#).unwrap();
        let variant = ProductVariant::try_from(input).unwrap();

        assert_eq!(variant.size(), "");
        assert_eq!(variant.color(), "");
        assert_eq!(variant.image_url(), "");
        assert_eq!(variant.price().value(), 12.5);
        assert_eq!(variant.stock().value(), 3);
    }

    #[test]
    fn price_and_stock_are_required() {
        let result = serde_json::from_str::<VariantInput>(r#"{"size": "M"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let result = ProductVariant::try_from(VariantInput::new(-1.0, 3));
        assert_eq!(result, Err(ValidationError::NegativePrice { price: -1.0 }));

        let result = ProductVariant::try_from(VariantInput::new(1.0, -3));
        assert_eq!(result, Err(ValidationError::NegativeStock { stock: -3 }));
    }

    #[test]
    fn serializes_with_image_url_key() {
        let variant = ProductVariant::try_from(
            VariantInput::new(10.0, 2)
                .with_size("L")
                .with_color("Black")
                .with_image_url("https://img.example/l.png"),
        )
        .unwrap();

        let json = serde_json::to_value(&variant).unwrap();
        assert_eq!(json["imageUrl"], "https://img.example/l.png");
        assert_eq!(json["size"], "L");
        assert_eq!(json["stock"], 2);
    }

    #[test]
    fn conversion_preserves_order() {
        let variants = variants_from_inputs(vec![
            VariantInput::new(1.0, 1).with_size("S"),
            VariantInput::new(2.0, 2).with_size("M"),
            VariantInput::new(3.0, 3).with_size("L"),
        ])
        .unwrap();

        let sizes: Vec<_> = variants.iter().map(ProductVariant::size).collect();
        assert_eq!(sizes, vec!["S", "M", "L"]);
    }
}
