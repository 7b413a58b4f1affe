//! Single product lookup.

use async_trait::async_trait;
use catalog_store::ProductStore;
use common::ProductId;
use domain::{DomainError, ProductRepository};

use crate::dto::ProductDto;
use crate::query::QueryHandler;

/// Query for one product by id.
#[derive(Debug, Clone, PartialEq)]
pub struct GetProduct {
    pub product_id: ProductId,
}

impl GetProduct {
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }
}

/// Loads a product and projects it, variants included.
pub struct GetProductHandler<S: ProductStore> {
    repository: ProductRepository<S>,
}

impl<S: ProductStore> GetProductHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            repository: ProductRepository::new(store),
        }
    }
}

#[async_trait]
impl<S: ProductStore> QueryHandler<GetProduct> for GetProductHandler<S> {
    type Output = ProductDto;

    #[tracing::instrument(skip(self))]
    async fn handle(&self, query: GetProduct) -> Result<ProductDto, DomainError> {
        let product = self.repository.get(&query.product_id).await?;
        Ok(ProductDto::from(&product))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_store::InMemoryProductStore;
    use domain::{CreateProduct, NoopEventSink, ProductService, VariantInput};

    use super::*;

    #[tokio::test]
    async fn projects_product_with_variants() {
        let store = InMemoryProductStore::new();
        let service = ProductService::new(store.clone(), Arc::new(NoopEventSink));
        let product = service
            .create_product(
                CreateProduct::new("Backpack", 80.0, 4)
                    .with_description("25L")
                    .with_variants(vec![
                        VariantInput::new(80.0, 2)
                            .with_color("Olive")
                            .with_image_url("olive.png"),
                    ]),
            )
            .await
            .unwrap();

        let handler = GetProductHandler::new(store);
        let dto = handler
            .handle(GetProduct::new(product.id().clone()))
            .await
            .unwrap();

        assert_eq!(dto.id, product.id().as_str());
        assert_eq!(dto.name, "Backpack");
        assert_eq!(dto.description, "25L");
        assert_eq!(dto.version, 1);
        assert_eq!(dto.variants.len(), 1);
        assert_eq!(dto.variants[0].stock, 2);
        assert_eq!(dto.variants[0].image_url, "olive.png");
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let handler = GetProductHandler::new(InMemoryProductStore::new());
        let result = handler.handle(GetProduct::new("missing")).await;
        assert!(matches!(result, Err(DomainError::ProductNotFound { .. })));
    }
}
