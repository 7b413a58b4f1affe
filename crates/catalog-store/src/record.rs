use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// Version number of a stored product, used for optimistic concurrency control.
///
/// A product that has never been saved is at version 0. The first save
/// stores version 1 and every later save increments it by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) of a product that was never saved.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version (1) written by the first save.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// Stored shape of a product variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub size: String,
    pub color: String,
    pub price: f64,
    pub stock: i64,
    pub image_url: String,
}

/// Stored shape of a product.
///
/// Records carry raw primitives only; validation happens when the domain
/// layer maps a record back into an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    /// Variants in display order.
    pub variants: Vec<VariantRecord>,
    /// Version of the stored state. Ignored on save; the store assigns it.
    pub version: Version,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Returns a copy of this record stamped with the given version.
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }
}
