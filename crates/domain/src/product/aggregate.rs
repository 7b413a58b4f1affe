//! Product aggregate implementation.

use catalog_store::{ProductRecord, VariantRecord, Version};
use chrono::{DateTime, Utc};
use common::ProductId;
use serde::Serialize;

use super::{ProductName, ProductPrice, ProductStock, ProductVariant, ValidationError};

/// Product aggregate root.
///
/// Owns an ordered list of variants. The id never changes; every other field
/// is replaced wholesale by its setter. `version` tracks the stored revision
/// the aggregate was loaded at and is advanced by the repository on save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: ProductId,
    name: ProductName,
    description: String,
    price: ProductPrice,
    stock: ProductStock,
    variants: Vec<ProductVariant>,
    #[serde(skip)]
    version: Version,
    #[serde(skip)]
    created_at: DateTime<Utc>,
    #[serde(skip)]
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a product that has not been persisted yet.
    pub fn new(
        id: ProductId,
        name: ProductName,
        description: impl Into<String>,
        price: ProductPrice,
        stock: ProductStock,
        variants: Vec<ProductVariant>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: description.into(),
            price,
            stock,
            variants,
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    // Query methods

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &ProductName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> ProductPrice {
        self.price
    }

    pub fn stock(&self) -> ProductStock {
        self.stock
    }

    pub fn variants(&self) -> &[ProductVariant] {
        &self.variants
    }

    /// Returns the stored version this aggregate reflects (0 if never saved).
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns true if the product was never persisted.
    pub fn is_new(&self) -> bool {
        self.version == Version::initial()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total value of the stock on hand (`price * stock`).
    pub fn inventory_value(&self) -> f64 {
        self.price.value() * self.stock.value() as f64
    }

    // Mutators

    pub fn set_name(&mut self, name: ProductName) {
        self.name = name;
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_price(&mut self, price: ProductPrice) {
        self.price = price;
        self.touch();
    }

    pub fn set_stock(&mut self, stock: ProductStock) {
        self.stock = stock;
        self.touch();
    }

    /// Replaces the whole variant list; previous variants are discarded.
    pub fn set_variants(&mut self, variants: Vec<ProductVariant>) {
        self.variants = variants;
        self.touch();
    }

    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let variants = record
            .variants
            .into_iter()
            .map(|v| {
                Ok(ProductVariant::new(
                    v.size,
                    v.color,
                    ProductPrice::new(v.price)?,
                    ProductStock::new(v.stock)?,
                    v.image_url,
                ))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self {
            id: record.id,
            name: ProductName::new(record.name)?,
            description: record.description,
            price: ProductPrice::new(record.price)?,
            stock: ProductStock::new(record.stock)?,
            variants,
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        ProductRecord {
            id: product.id.clone(),
            name: product.name.value().to_string(),
            description: product.description.clone(),
            price: product.price.value(),
            stock: product.stock.value(),
            variants: product
                .variants
                .iter()
                .map(|v| VariantRecord {
                    size: v.size().to_string(),
                    color: v.color().to_string(),
                    price: v.price().value(),
                    stock: v.stock().value(),
                    image_url: v.image_url().to_string(),
                })
                .collect(),
            version: product.version,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
