//! Catalog statistics and inventory valuation.

use async_trait::async_trait;
use catalog_store::ProductStore;
use domain::{DomainError, ProductRepository};

use crate::dto::{InventoryValuationDto, InventoryValueDto, ProductStatsDto};
use crate::query::QueryHandler;

/// Products with fewer units than this count as low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Query for catalog-wide totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductStats;

/// Query for per-product inventory values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryValuation;

/// Computes statistics over the whole catalog.
pub struct ProductStatsHandler<S: ProductStore> {
    repository: ProductRepository<S>,
}

impl<S: ProductStore> ProductStatsHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            repository: ProductRepository::new(store),
        }
    }
}

#[async_trait]
impl<S: ProductStore> QueryHandler<ProductStats> for ProductStatsHandler<S> {
    type Output = ProductStatsDto;

    #[tracing::instrument(skip(self))]
    async fn handle(&self, _query: ProductStats) -> Result<ProductStatsDto, DomainError> {
        let products = self.repository.find_all().await?;

        Ok(ProductStatsDto {
            total_products: products.len() as u64,
            total_stock: products
                .iter()
                .fold(0i64, |acc, p| acc.saturating_add(p.stock().value())),
            total_value: products.iter().map(|p| p.inventory_value()).sum(),
            low_stock_count: products
                .iter()
                .filter(|p| p.stock().value() < LOW_STOCK_THRESHOLD)
                .count() as u64,
        })
    }
}

#[async_trait]
impl<S: ProductStore> QueryHandler<InventoryValuation> for ProductStatsHandler<S> {
    type Output = InventoryValuationDto;

    #[tracing::instrument(skip(self))]
    async fn handle(&self, _query: InventoryValuation) -> Result<InventoryValuationDto, DomainError> {
        let products = self.repository.find_all().await?;

        let mut values: Vec<InventoryValueDto> =
            products.iter().map(InventoryValueDto::from).collect();
        // Stable, so equal values keep listing order
        values.sort_by(|a, b| b.value.total_cmp(&a.value));

        Ok(InventoryValuationDto {
            count: values.len(),
            products: values,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_store::InMemoryProductStore;
    use domain::{CreateProduct, NoopEventSink, ProductService};

    use super::*;

    async fn seeded_handler() -> ProductStatsHandler<InMemoryProductStore> {
        let store = InMemoryProductStore::new();
        let service = ProductService::new(store.clone(), Arc::new(NoopEventSink));
        for (name, price, stock) in [
            ("Pen", 1.5, 100),
            ("Notebook", 4.0, 3),
            ("Stapler", 12.0, 0),
            ("Desk", 150.0, 2),
        ] {
            service
                .create_product(CreateProduct::new(name, price, stock))
                .await
                .unwrap();
        }
        ProductStatsHandler::new(store)
    }

    #[tokio::test]
    async fn stats_sum_the_catalog() {
        let handler = seeded_handler().await;
        let stats = handler.handle(ProductStats).await.unwrap();

        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.total_stock, 105);
        assert!((stats.total_value - 462.0).abs() < 1e-9);
        assert_eq!(stats.low_stock_count, 3);
    }

    #[tokio::test]
    async fn stats_of_empty_catalog_are_zero() {
        let handler = ProductStatsHandler::new(InMemoryProductStore::new());
        let stats = handler.handle(ProductStats).await.unwrap();

        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.total_stock, 0);
        assert_eq!(stats.total_value, 0.0);
        assert_eq!(stats.low_stock_count, 0);
    }

    #[tokio::test]
    async fn valuation_is_sorted_by_value_descending() {
        let handler = seeded_handler().await;
        let valuation = handler.handle(InventoryValuation).await.unwrap();

        let names: Vec<_> = valuation.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Desk", "Pen", "Notebook", "Stapler"]);
        assert_eq!(valuation.count, 4);
        assert_eq!(valuation.products[0].value, 300.0);
        assert_eq!(valuation.products[3].value, 0.0);
    }
}
