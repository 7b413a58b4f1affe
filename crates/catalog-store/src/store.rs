use std::sync::Arc;

use async_trait::async_trait;

use crate::{Page, PageRequest, ProductId, ProductRecord, Result, Version};

/// Page size used when walking the whole catalog.
const SCAN_PAGE_SIZE: u32 = 100;

/// Options for saving a product.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Expected stored version for optimistic concurrency control.
    /// If None, no version check is performed (last write wins).
    pub expected_version: Option<Version>,
}

impl SaveOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the product to be stored at a specific version.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Creates options expecting the product to not be stored yet.
    pub fn expect_new() -> Self {
        Self {
            expected_version: Some(Version::initial()),
        }
    }
}

/// Core trait for product store implementations.
///
/// A product store persists [`ProductRecord`]s keyed by id. All
/// implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Inserts or replaces the product with the record's id.
    ///
    /// If `options.expected_version` is set, the save fails with
    /// `ConcurrencyConflict` unless the stored version matches (a missing
    /// product counts as version 0). Variants are replaced wholesale.
    ///
    /// Returns the new stored version.
    async fn save(&self, record: ProductRecord, options: SaveOptions) -> Result<Version>;

    /// Retrieves a product by id.
    ///
    /// Returns None if the product doesn't exist.
    async fn find(&self, id: &ProductId) -> Result<Option<ProductRecord>>;

    /// Retrieves one page of products in creation order, together with the
    /// total number of stored products.
    ///
    /// Creation order is by `created_at` at microsecond precision, ties broken
    /// by id. The in-memory store keeps insertion order, which never ties.
    async fn find_page(&self, page: PageRequest) -> Result<Page<ProductRecord>>;

    /// Removes a product. Removing a missing product is a no-op.
    async fn delete(&self, id: &ProductId) -> Result<()>;

    /// Returns the number of stored products.
    async fn count(&self) -> Result<u64>;
}

/// Extension trait providing convenience methods for product stores.
#[async_trait]
pub trait ProductStoreExt: ProductStore {
    /// Checks whether a product is stored.
    async fn exists(&self, id: &ProductId) -> Result<bool> {
        Ok(self.find(id).await?.is_some())
    }

    /// Retrieves every stored product in creation order.
    ///
    /// Walks the catalog page by page, so it sees a consistent order but not
    /// a consistent snapshot.
    async fn find_all(&self) -> Result<Vec<ProductRecord>> {
        let total = self.count().await?;
        let mut records = Vec::with_capacity(usize::try_from(total).unwrap_or_default());
        if total == 0 {
            return Ok(records);
        }
        let mut request = PageRequest {
            page: 1,
            limit: SCAN_PAGE_SIZE,
        };

        loop {
            let page = self.find_page(request).await?;
            let fetched = page.items.len();
            records.extend(page.items);
            if fetched < SCAN_PAGE_SIZE as usize {
                break;
            }
            request = request.next();
        }

        Ok(records)
    }
}

// Blanket implementation for all ProductStore implementations
impl<T: ProductStore + ?Sized> ProductStoreExt for T {}

#[async_trait]
impl<T: ProductStore + ?Sized> ProductStore for Arc<T> {
    async fn save(&self, record: ProductRecord, options: SaveOptions) -> Result<Version> {
        (**self).save(record, options).await
    }

    async fn find(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        (**self).find(id).await
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ProductRecord>> {
        (**self).find_page(page).await
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        (**self).delete(id).await
    }

    async fn count(&self) -> Result<u64> {
        (**self).count().await
    }
}
