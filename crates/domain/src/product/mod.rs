//! Product aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod inventory;
mod service;
mod value_objects;
mod variant;

pub use aggregate::Product;
pub use commands::*;
pub use events::ProductEvent;
pub use inventory::InventoryService;
pub use service::ProductService;
pub use value_objects::{ProductName, ProductPrice, ProductStock};
pub use variant::{ProductVariant, VariantInput};

use catalog_store::PageRequestError;
use thiserror::Error;

/// Errors raised when a value fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Product name is empty.
    #[error("Product name cannot be empty")]
    EmptyName,

    /// Product name exceeds the maximum length.
    #[error("Product name is too long: {length} characters (maximum {max})")]
    NameTooLong { length: usize, max: usize },

    /// Price is below zero.
    #[error("Price cannot be negative: {price}")]
    NegativePrice { price: f64 },

    /// Price is NaN or infinite.
    #[error("Price must be a finite number")]
    NonFinitePrice,

    /// Stock is below zero.
    #[error("Stock cannot be negative: {stock}")]
    NegativeStock { stock: i64 },

    /// Increasing stock would overflow its representation.
    #[error("Stock overflow: cannot add {quantity} to {current}")]
    StockOverflow { current: i64, quantity: u32 },

    /// Page or limit is zero.
    #[error("Invalid pagination: page {page}, limit {limit} (both must be at least 1)")]
    InvalidPagination { page: u32, limit: u32 },
}

impl From<PageRequestError> for ValidationError {
    fn from(e: PageRequestError) -> Self {
        ValidationError::InvalidPagination {
            page: e.page,
            limit: e.limit,
        }
    }
}
