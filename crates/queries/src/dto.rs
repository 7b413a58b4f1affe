//! Transfer shapes returned by the query handlers.

use domain::{Product, ProductVariant};
use serde::{Deserialize, Serialize};

/// Full view of a product, including every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub variants: Vec<ProductVariantDto>,
    pub version: i64,
}

/// Full view of a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariantDto {
    pub size: String,
    pub color: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: String,
}

impl From<&ProductVariant> for ProductVariantDto {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            size: variant.size().to_string(),
            color: variant.color().to_string(),
            price: variant.price().value(),
            stock: variant.stock().value(),
            image_url: variant.image_url().to_string(),
        }
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().value().to_string(),
            description: product.description().to_string(),
            price: product.price().value(),
            stock: product.stock().value(),
            variants: product.variants().iter().map(Into::into).collect(),
            version: product.version().as_i64(),
        }
    }
}

/// Listing view of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub variants: Vec<VariantSummaryDto>,
}

/// Listing view of a variant; stock is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummaryDto {
    pub size: String,
    pub color: String,
    pub price: f64,
}

impl From<&ProductVariant> for VariantSummaryDto {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            size: variant.size().to_string(),
            color: variant.color().to_string(),
            price: variant.price().value(),
        }
    }
}

impl From<&Product> for ProductSummaryDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().value().to_string(),
            description: product.description().to_string(),
            price: product.price().value(),
            stock: product.stock().value(),
            variants: product.variants().iter().map(Into::into).collect(),
        }
    }
}

/// One page of product summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsListDto {
    pub products: Vec<ProductSummaryDto>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// Catalog-wide totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStatsDto {
    pub total_products: u64,
    pub total_stock: i64,
    pub total_value: f64,
    pub low_stock_count: u64,
}

/// Value of the stock on hand for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValueDto {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub price: f64,
    pub value: f64,
}

impl From<&Product> for InventoryValueDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().value().to_string(),
            stock: product.stock().value(),
            price: product.price().value(),
            value: product.inventory_value(),
        }
    }
}

/// Per-product inventory values, most valuable first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuationDto {
    pub products: Vec<InventoryValueDto>,
    pub count: usize,
}
