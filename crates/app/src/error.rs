//! Application-level error type.

use catalog_store::StoreError;
use domain::DomainError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while starting or running the catalog.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The storage backend could not be reached or prepared.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A command or query failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Logging or metrics could not be installed.
    #[error("Telemetry setup failed: {0}")]
    Telemetry(String),
}

impl AppError {
    /// Returns true for errors caused by the caller's input or a lost race,
    /// as opposed to infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Domain(
                DomainError::Validation(_)
                    | DomainError::ProductNotFound { .. }
                    | DomainError::InsufficientStock { .. }
                    | DomainError::ConcurrentModification { .. }
            )
        )
    }
}
