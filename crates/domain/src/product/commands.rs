//! Product commands.

use catalog_store::Version;
use common::ProductId;
use serde::{Deserialize, Serialize};

use super::VariantInput;

/// A per-field update: either leave the field alone or replace it.
///
/// Keeps "no change requested" distinct from "set to an empty value".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Unchanged,
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Returns true if a new value was supplied.
    pub fn is_set(&self) -> bool {
        matches!(self, FieldUpdate::Set(_))
    }

    /// Converts the supplied value, if any, keeping `Unchanged` as is.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        match self {
            FieldUpdate::Unchanged => Ok(FieldUpdate::Unchanged),
            FieldUpdate::Set(value) => f(value).map(FieldUpdate::Set),
        }
    }

    /// Returns the supplied value, if any.
    pub fn into_option(self) -> Option<T> {
        match self {
            FieldUpdate::Unchanged => None,
            FieldUpdate::Set(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldUpdate::Unchanged, FieldUpdate::Set)
    }
}

/// Command to create a new product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

impl CreateProduct {
    /// Creates a new CreateProduct command with no description or variants.
    pub fn new(name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            stock,
            variants: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_variants(mut self, variants: Vec<VariantInput>) -> Self {
        self.variants = variants;
        self
    }
}

/// Command to update some fields of an existing product.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub product_id: ProductId,
    pub name: FieldUpdate<String>,
    pub description: FieldUpdate<String>,
    pub price: FieldUpdate<f64>,
    pub stock: FieldUpdate<i64>,
    pub variants: FieldUpdate<Vec<VariantInput>>,

    /// Version the caller last saw. When set, the update is refused if the
    /// product has moved on since.
    pub expected_version: Option<Version>,
}

impl UpdateProduct {
    /// Creates an update that changes nothing.
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            name: FieldUpdate::Unchanged,
            description: FieldUpdate::Unchanged,
            price: FieldUpdate::Unchanged,
            stock: FieldUpdate::Unchanged,
            variants: FieldUpdate::Unchanged,
            expected_version: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = FieldUpdate::Set(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = FieldUpdate::Set(description.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = FieldUpdate::Set(price);
        self
    }

    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = FieldUpdate::Set(stock);
        self
    }

    pub fn variants(mut self, variants: Vec<VariantInput>) -> Self {
        self.variants = FieldUpdate::Set(variants);
        self
    }

    pub fn expect_version(mut self, version: Version) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Command to delete a product.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteProduct {
    pub product_id: ProductId,
}

impl DeleteProduct {
    pub fn new(product_id: ProductId) -> Self {
        Self { product_id }
    }
}

/// Command to remove units from a product's stock.
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceStock {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl ReduceStock {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Command to add units to a product's stock.
#[derive(Debug, Clone, PartialEq)]
pub struct IncreaseStock {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl IncreaseStock {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Command to adjust stock by a signed quantity, recording why.
///
/// Positive quantities add stock, negative ones remove it, zero leaves it
/// unchanged (the adjustment is still announced).
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustStock {
    pub product_id: ProductId,
    pub quantity: i32,
    pub reason: String,
}

impl AdjustStock {
    pub fn new(product_id: ProductId, quantity: i32, reason: impl Into<String>) -> Self {
        Self {
            product_id,
            quantity,
            reason: reason.into(),
        }
    }
}
