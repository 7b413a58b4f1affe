//! Paginated product listing.

use async_trait::async_trait;
use catalog_store::ProductStore;
use domain::{DomainError, ProductRepository};

use crate::dto::{ProductSummaryDto, ProductsListDto};
use crate::query::QueryHandler;

/// Query for one page (1-indexed) of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListProducts {
    pub page: u32,
    pub limit: u32,
}

impl ListProducts {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for ListProducts {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// Lists products page by page, as summaries.
pub struct ListProductsHandler<S: ProductStore> {
    repository: ProductRepository<S>,
}

impl<S: ProductStore> ListProductsHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            repository: ProductRepository::new(store),
        }
    }
}

#[async_trait]
impl<S: ProductStore> QueryHandler<ListProducts> for ListProductsHandler<S> {
    type Output = ProductsListDto;

    #[tracing::instrument(skip(self))]
    async fn handle(&self, query: ListProducts) -> Result<ProductsListDto, DomainError> {
        let page = self.repository.find_page(query.page, query.limit).await?;

        Ok(ProductsListDto {
            products: page.items.iter().map(ProductSummaryDto::from).collect(),
            page: query.page,
            limit: query.limit,
            total: page.total,
            total_pages: page.total.div_ceil(u64::from(query.limit)),
        })
    }
}
