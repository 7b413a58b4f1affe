//! Criteria-based product search.

use async_trait::async_trait;
use catalog_store::ProductStore;
use domain::{DomainError, Product, ProductRepository};
use serde::{Deserialize, Serialize};

use crate::dto::ProductSummaryDto;
use crate::query::QueryHandler;

/// Search filters. Every supplied criterion must match; an empty criteria
/// set matches every product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Case-insensitive substring of the product name.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_stock: Option<i64>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn min_price(mut self, price: f64) -> Self {
        self.min_price = Some(price);
        self
    }

    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn min_stock(mut self, stock: i64) -> Self {
        self.min_stock = Some(stock);
        self
    }

    /// Returns true if the product satisfies every supplied criterion.
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price().value();
        let stock = product.stock().value();

        self.name.as_ref().is_none_or(|needle| {
            product
                .name()
                .value()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        }) && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
            && self.min_stock.is_none_or(|min| stock >= min)
    }
}

/// Searches the whole catalog, in listing order.
pub struct SearchProductsHandler<S: ProductStore> {
    repository: ProductRepository<S>,
}

impl<S: ProductStore> SearchProductsHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            repository: ProductRepository::new(store),
        }
    }
}

#[async_trait]
impl<S: ProductStore> QueryHandler<SearchCriteria> for SearchProductsHandler<S> {
    type Output = Vec<ProductSummaryDto>;

    #[tracing::instrument(skip(self))]
    async fn handle(&self, criteria: SearchCriteria) -> Result<Vec<ProductSummaryDto>, DomainError> {
        let products = self.repository.find_all().await?;
        let matches: Vec<_> = products
            .iter()
            .filter(|p| criteria.matches(p))
            .map(ProductSummaryDto::from)
            .collect();

        tracing::debug!(scanned = products.len(), matched = matches.len(), "search complete");
        Ok(matches)
    }
}
