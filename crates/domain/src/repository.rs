//! Typed repository over a product store.

use catalog_store::{
    Page, PageRequest, ProductRecord, ProductStore, ProductStoreExt, SaveOptions, Version,
};
use common::ProductId;

use crate::error::DomainError;
use crate::product::{Product, ValidationError};

/// Maps between stored records and [`Product`] aggregates.
///
/// Every save is version-checked: a product that was never persisted must not
/// exist yet, and an existing product must still be stored at the version it
/// was loaded at. A mismatch surfaces as
/// [`DomainError::ConcurrentModification`].
pub struct ProductRepository<S: ProductStore> {
    store: S,
}

impl<S: ProductStore> ProductRepository<S> {
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads a product, returning None if it doesn't exist.
    pub async fn find(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        match self.store.find(id).await? {
            Some(record) => Ok(Some(Product::try_from(record)?)),
            None => Ok(None),
        }
    }

    /// Loads a product, failing with `ProductNotFound` if it doesn't exist.
    pub async fn get(&self, id: &ProductId) -> Result<Product, DomainError> {
        self.find(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    /// Persists a product and advances its version.
    pub async fn save(&self, product: &mut Product) -> Result<Version, DomainError> {
        let options = if product.is_new() {
            SaveOptions::expect_new()
        } else {
            SaveOptions::expect_version(product.version())
        };

        let new_version = self
            .store
            .save(ProductRecord::from(&*product), options)
            .await?;
        product.set_version(new_version);

        tracing::debug!(product_id = %product.id(), version = %new_version, "product saved");
        Ok(new_version)
    }

    /// Removes a product. Removing a missing product is a no-op.
    pub async fn delete(&self, id: &ProductId) -> Result<(), DomainError> {
        self.store.delete(id).await?;
        Ok(())
    }

    /// Loads one page of products (1-indexed) with the total count.
    pub async fn find_page(&self, page: u32, limit: u32) -> Result<Page<Product>, DomainError> {
        let request = PageRequest::new(page, limit).map_err(ValidationError::from)?;
        let page = self.store.find_page(request).await?;
        Ok(page.try_map(Product::try_from)?)
    }

    /// Loads every product in listing order.
    pub async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let records = self.store.find_all().await?;
        Ok(records
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<_, _>>()?)
    }

    /// Returns the number of stored products.
    pub async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.store.count().await?)
    }
}
