use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Page, PageRequest, ProductId, ProductRecord, Result, StoreError, Version,
    store::{ProductStore, SaveOptions},
};

/// In-memory product store.
///
/// Records are kept in insertion order, which doubles as the listing order.
/// Used by tests and as the default runtime backend.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    records: Arc<RwLock<Vec<ProductRecord>>>,
}

impl InMemoryProductStore {
    /// Creates a new empty in-memory product store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no products are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Removes every stored product.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn save(&self, record: ProductRecord, options: SaveOptions) -> Result<Version> {
        let mut store = self.records.write().await;

        let position = store.iter().position(|r| r.id == record.id);
        let current_version = position
            .map(|i| store[i].version)
            .unwrap_or(Version::initial());

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            return Err(StoreError::ConcurrencyConflict {
                product_id: record.id,
                expected,
                actual: current_version,
            });
        }

        let new_version = current_version.next();
        let record = record.with_version(new_version);
        match position {
            Some(i) => store[i] = record,
            None => store.push(record),
        }

        Ok(new_version)
    }

    async fn find(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        let store = self.records.read().await;
        Ok(store.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ProductRecord>> {
        let store = self.records.read().await;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = store
            .iter()
            .skip(offset)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, store.len() as u64))
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        self.records.write().await.retain(|r| &r.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{ProductStoreExt, VariantRecord};

    fn create_test_record(id: &str, name: &str) -> ProductRecord {
        let now = Utc::now();
        ProductRecord {
            id: ProductId::new(id),
            name: name.to_string(),
            description: "A test product".to_string(),
            price: 19.99,
            stock: 10,
            variants: vec![VariantRecord {
                size: "M".to_string(),
                color: "Red".to_string(),
                price: 21.5,
                stock: 4,
                image_url: "https://img.example/red-m.png".to_string(),
            }],
            version: Version::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed(store: &InMemoryProductStore, count: usize) {
        for i in 0..count {
            store
                .save(
                    create_test_record(&format!("p-{i:03}"), &format!("Product {i}")),
                    SaveOptions::expect_new(),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn save_new_product() {
        let store = InMemoryProductStore::new();
        let record = create_test_record("p-1", "Shirt");

        let version = store
            .save(record.clone(), SaveOptions::expect_new())
            .await
            .unwrap();
        assert_eq!(version, Version::first());

        let found = store.find(&record.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Shirt");
        assert_eq!(found.version, Version::first());
        assert_eq!(found.variants, record.variants);
    }

    #[tokio::test]
    async fn save_replaces_existing_product() {
        let store = InMemoryProductStore::new();
        let record = create_test_record("p-1", "Shirt");
        store
            .save(record.clone(), SaveOptions::expect_new())
            .await
            .unwrap();

        let mut updated = record.clone();
        updated.name = "Polo".to_string();
        updated.variants.clear();
        let version = store
            .save(updated, SaveOptions::expect_version(Version::first()))
            .await
            .unwrap();

        assert_eq!(version, Version::new(2));
        assert_eq!(store.len().await, 1);
        let found = store.find(&record.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Polo");
        assert!(found.variants.is_empty());
    }

    #[tokio::test]
    async fn concurrency_conflict_on_stale_version() {
        let store = InMemoryProductStore::new();
        let record = create_test_record("p-1", "Shirt");
        store
            .save(record.clone(), SaveOptions::expect_new())
            .await
            .unwrap();
        store
            .save(record.clone(), SaveOptions::expect_version(Version::first()))
            .await
            .unwrap();

        // Second writer still holds version 1
        let result = store
            .save(record, SaveOptions::expect_version(Version::first()))
            .await;

        assert!(matches!(
            result,
            Err(StoreError::ConcurrencyConflict { expected, actual, .. })
                if expected == Version::first() && actual == Version::new(2)
        ));
    }

    #[tokio::test]
    async fn concurrency_conflict_when_creating_existing_id() {
        let store = InMemoryProductStore::new();
        let record = create_test_record("p-1", "Shirt");
        store
            .save(record.clone(), SaveOptions::expect_new())
            .await
            .unwrap();

        let result = store.save(record, SaveOptions::expect_new()).await;
        assert!(matches!(
            result,
            Err(StoreError::ConcurrencyConflict { .. })
        ));
    }

    #[tokio::test]
    async fn unchecked_save_always_wins() {
        let store = InMemoryProductStore::new();
        let record = create_test_record("p-1", "Shirt");
        store.save(record.clone(), SaveOptions::new()).await.unwrap();
        let version = store.save(record, SaveOptions::new()).await.unwrap();
        assert_eq!(version, Version::new(2));
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = InMemoryProductStore::new();
        let found = store.find(&ProductId::new("missing")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_page_applies_offset_and_limit() {
        let store = InMemoryProductStore::new();
        seed(&store, 25).await;

        let page = store
            .find_page(PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.items[0].id, ProductId::new("p-010"));

        let last = store
            .find_page(PageRequest::new(3, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(last.items.len(), 5);

        let beyond = store
            .find_page(PageRequest::new(4, 10).unwrap())
            .await
            .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 25);
    }

    #[tokio::test]
    async fn update_keeps_listing_position() {
        let store = InMemoryProductStore::new();
        seed(&store, 3).await;

        let mut first = store.find(&ProductId::new("p-000")).await.unwrap().unwrap();
        first.name = "Renamed".to_string();
        store.save(first, SaveOptions::new()).await.unwrap();

        let page = store
            .find_page(PageRequest::first(10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.items[0].name, "Renamed");
    }

    #[tokio::test]
    async fn delete_removes_product() {
        let store = InMemoryProductStore::new();
        seed(&store, 2).await;

        store.delete(&ProductId::new("p-000")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(!store.exists(&ProductId::new("p-000")).await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_is_noop() {
        let store = InMemoryProductStore::new();
        seed(&store, 1).await;

        store.delete(&ProductId::new("missing")).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_all_walks_every_page() {
        let store = InMemoryProductStore::new();
        seed(&store, 230).await;

        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 230);
        assert_eq!(all[0].id, ProductId::new("p-000"));
        assert_eq!(all[229].id, ProductId::new("p-229"));
    }

    #[tokio::test]
    async fn find_all_on_empty_store() {
        let store = InMemoryProductStore::new();
        assert!(store.find_all().await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = InMemoryProductStore::new();
        seed(&store, 5).await;
        store.clear().await;
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
