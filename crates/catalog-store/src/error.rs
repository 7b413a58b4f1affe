use thiserror::Error;

use crate::{ProductId, Version};

/// Errors that can occur when interacting with a product store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional save found a different stored version than expected.
    #[error(
        "Concurrency conflict for product {product_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        product_id: ProductId,
        expected: Version,
        actual: Version,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A document store error occurred.
    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// A stored product could not be read back into a record.
    #[error("Invalid stored product {product_id}: {reason}")]
    InvalidDocument {
        product_id: ProductId,
        reason: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
