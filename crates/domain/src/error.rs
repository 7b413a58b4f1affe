//! Domain error types.

use catalog_store::{StoreError, Version};
use common::ProductId;
use thiserror::Error;

use crate::product::ValidationError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A value failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No product with the given id exists.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// A stock reduction asked for more than is on hand.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: i64,
    },

    /// The product changed since it was loaded.
    #[error("Concurrent modification of product {product_id}: expected version {expected}, found {actual}")]
    ConcurrentModification {
        product_id: ProductId,
        expected: Version,
        actual: Version,
    },

    /// An error occurred in the product store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl DomainError {
    pub(crate) fn not_found(product_id: &ProductId) -> Self {
        DomainError::ProductNotFound {
            product_id: product_id.clone(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ConcurrencyConflict {
                product_id,
                expected,
                actual,
            } => DomainError::ConcurrentModification {
                product_id,
                expected,
                actual,
            },
            other => DomainError::Store(other),
        }
    }
}
