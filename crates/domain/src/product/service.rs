//! Product service providing the command API for the catalog.

use std::sync::Arc;

use catalog_store::ProductStore;
use common::ProductId;

use crate::error::DomainError;
use crate::event::EventSink;
use crate::repository::ProductRepository;

use super::variant::variants_from_inputs;
use super::{
    CreateProduct, DeleteProduct, IncreaseStock, Product, ProductEvent, ProductName,
    ProductPrice, ProductStock, ReduceStock, UpdateProduct,
};

/// Service for managing products.
///
/// Each command loads the product, applies the change, saves it with a
/// version check and then publishes the matching event. Nothing is published
/// when a command fails.
pub struct ProductService<S: ProductStore> {
    repository: ProductRepository<S>,
    events: Arc<dyn EventSink>,
}

impl<S: ProductStore> ProductService<S> {
    /// Creates a new product service over the given store and event sink.
    pub fn new(store: S, events: Arc<dyn EventSink>) -> Self {
        Self {
            repository: ProductRepository::new(store),
            events,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &ProductRepository<S> {
        &self.repository
    }

    pub(crate) fn events(&self) -> &Arc<dyn EventSink> {
        &self.events
    }

    /// Creates a product with a freshly generated id.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, cmd: CreateProduct) -> Result<Product, DomainError> {
        let name = ProductName::new(cmd.name)?;
        let price = ProductPrice::new(cmd.price)?;
        let stock = ProductStock::new(cmd.stock)?;
        let variants = variants_from_inputs(cmd.variants)?;

        let mut product = Product::new(
            ProductId::generate(),
            name,
            cmd.description,
            price,
            stock,
            variants,
        );
        self.repository.save(&mut product).await?;

        metrics::counter!("catalog_products_created_total").increment(1);
        tracing::info!(product_id = %product.id(), "product created");

        self.events
            .publish(ProductEvent::Created {
                product: product.clone(),
            })
            .await;
        Ok(product)
    }

    /// Applies the supplied fields to an existing product.
    ///
    /// Every supplied value is validated before any field changes.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, cmd: UpdateProduct) -> Result<Product, DomainError> {
        let mut product = self.repository.get(&cmd.product_id).await?;

        if let Some(expected) = cmd.expected_version
            && expected != product.version()
        {
            return Err(DomainError::ConcurrentModification {
                product_id: cmd.product_id,
                expected,
                actual: product.version(),
            });
        }

        let name = cmd.name.try_map(ProductName::new)?;
        let price = cmd.price.try_map(ProductPrice::new)?;
        let stock = cmd.stock.try_map(ProductStock::new)?;
        let variants = cmd.variants.try_map(variants_from_inputs)?;

        if let Some(name) = name.into_option() {
            product.set_name(name);
        }
        if let Some(description) = cmd.description.into_option() {
            product.set_description(description);
        }
        if let Some(price) = price.into_option() {
            product.set_price(price);
        }
        if let Some(stock) = stock.into_option() {
            product.set_stock(stock);
        }
        if let Some(variants) = variants.into_option() {
            product.set_variants(variants);
        }

        self.repository.save(&mut product).await?;

        metrics::counter!("catalog_products_updated_total").increment(1);
        tracing::info!(product_id = %product.id(), version = %product.version(), "product updated");

        self.events
            .publish(ProductEvent::Updated {
                product: product.clone(),
            })
            .await;
        Ok(product)
    }

    /// Deletes an existing product.
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(&self, cmd: DeleteProduct) -> Result<(), DomainError> {
        if self.repository.find(&cmd.product_id).await?.is_none() {
            return Err(DomainError::not_found(&cmd.product_id));
        }

        self.repository.delete(&cmd.product_id).await?;

        metrics::counter!("catalog_products_deleted_total").increment(1);
        tracing::info!(product_id = %cmd.product_id, "product deleted");

        self.events
            .publish(ProductEvent::Deleted {
                product_id: cmd.product_id,
            })
            .await;
        Ok(())
    }

    /// Removes units from a product's stock.
    ///
    /// Fails with `InsufficientStock`, leaving the stock unchanged, if fewer
    /// units are on hand than requested.
    #[tracing::instrument(skip(self))]
    pub async fn reduce_stock(&self, cmd: ReduceStock) -> Result<Product, DomainError> {
        let mut product = self.repository.get(&cmd.product_id).await?;

        let current = product.stock();
        let stock = current
            .reduce(cmd.quantity)
            .ok_or_else(|| DomainError::InsufficientStock {
                product_id: cmd.product_id.clone(),
                requested: cmd.quantity,
                available: current.value(),
            })?;

        product.set_stock(stock);
        self.repository.save(&mut product).await?;

        metrics::counter!("catalog_stock_adjustments_total", "direction" => "reduce").increment(1);
        tracing::info!(
            product_id = %cmd.product_id,
            quantity = cmd.quantity,
            stock = stock.value(),
            "stock reduced"
        );
        Ok(product)
    }

    /// Adds units to a product's stock.
    #[tracing::instrument(skip(self))]
    pub async fn increase_stock(&self, cmd: IncreaseStock) -> Result<Product, DomainError> {
        let mut product = self.repository.get(&cmd.product_id).await?;

        let stock = product.stock().increase(cmd.quantity)?;
        product.set_stock(stock);
        self.repository.save(&mut product).await?;

        metrics::counter!("catalog_stock_adjustments_total", "direction" => "increase")
            .increment(1);
        tracing::info!(
            product_id = %cmd.product_id,
            quantity = cmd.quantity,
            stock = stock.value(),
            "stock increased"
        );
        Ok(product)
    }

    /// Loads a product, failing with `ProductNotFound` if it doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product, DomainError> {
        self.repository.get(product_id).await
    }

    /// Loads a product by ID.
    ///
    /// Returns None if the product doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn find_product(&self, product_id: &ProductId) -> Result<Option<Product>, DomainError> {
        self.repository.find(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use catalog_store::{InMemoryProductStore, Version};

    use super::*;
    use crate::event::InMemoryEventSink;
    use crate::product::{FieldUpdate, ValidationError, VariantInput};

    fn create_service() -> (ProductService<InMemoryProductStore>, InMemoryEventSink) {
        let sink = InMemoryEventSink::new();
        let service = ProductService::new(InMemoryProductStore::new(), Arc::new(sink.clone()));
        (service, sink)
    }

    #[tokio::test]
    async fn test_create_product() {
        let (service, sink) = create_service();

        let product = service
            .create_product(
                CreateProduct::new("Lamp", 35.0, 7).with_variants(vec![
                    VariantInput::new(35.0, 4).with_color("White"),
                    VariantInput::new(37.5, 3).with_color("Black"),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(product.version(), Version::first());
        assert_eq!(product.variants().len(), 2);
        assert_eq!(sink.event_types().await, vec!["ProductCreated"]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_event() {
        let (service, sink) = create_service();

        let result = service.create_product(CreateProduct::new("", 1.0, 1)).await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::EmptyName))
        ));

        let result = service
            .create_product(
                CreateProduct::new("Lamp", 1.0, 1).with_variants(vec![VariantInput::new(1.0, -1)]),
            )
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::NegativeStock { stock: -1 }))
        ));

        assert!(sink.is_empty().await);
        assert_eq!(service.repository().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_validates_before_changing_anything() {
        let (service, _sink) = create_service();
        let product = service
            .create_product(CreateProduct::new("Lamp", 35.0, 7))
            .await
            .unwrap();

        let mut cmd = UpdateProduct::new(product.id().clone()).name("Desk lamp");
        cmd.price = FieldUpdate::Set(-1.0);
        let result = service.update_product(cmd).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let stored = service.get_product(product.id()).await.unwrap();
        assert_eq!(stored.name().value(), "Lamp");
        assert_eq!(stored.version(), Version::first());
    }

    #[tokio::test]
    async fn test_update_with_stale_expected_version() {
        let (service, sink) = create_service();
        let product = service
            .create_product(CreateProduct::new("Lamp", 35.0, 7))
            .await
            .unwrap();
        service
            .update_product(UpdateProduct::new(product.id().clone()).stock(3))
            .await
            .unwrap();

        let result = service
            .update_product(
                UpdateProduct::new(product.id().clone())
                    .stock(9)
                    .expect_version(Version::first()),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::ConcurrentModification { expected, actual, .. })
                if expected == Version::first() && actual == Version::new(2)
        ));
        assert_eq!(
            service.get_product(product.id()).await.unwrap().stock().value(),
            3
        );
        assert_eq!(sink.len().await, 2);
    }

    #[tokio::test]
    async fn test_increase_stock_overflow() {
        let (service, _sink) = create_service();
        let product = service
            .create_product(CreateProduct::new("Bolt", 0.1, i64::MAX))
            .await
            .unwrap();

        let result = service
            .increase_stock(IncreaseStock::new(product.id().clone(), 1))
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Validation(ValidationError::StockOverflow { .. }))
        ));
    }

    #[tokio::test]
    async fn test_stock_changes_do_not_publish() {
        let (service, sink) = create_service();
        let product = service
            .create_product(CreateProduct::new("Bolt", 0.1, 10))
            .await
            .unwrap();
        sink.clear().await;

        service
            .reduce_stock(ReduceStock::new(product.id().clone(), 4))
            .await
            .unwrap();
        service
            .increase_stock(IncreaseStock::new(product.id().clone(), 1))
            .await
            .unwrap();

        assert!(sink.is_empty().await);
        assert_eq!(
            service.get_product(product.id()).await.unwrap().stock().value(),
            7
        );
    }

    #[tokio::test]
    async fn test_find_product_returns_none_for_missing() {
        let (service, _sink) = create_service();
        let found = service
            .find_product(&ProductId::new("missing"))
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
