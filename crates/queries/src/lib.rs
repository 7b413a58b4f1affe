//! Query side of the product catalog.
//!
//! This crate provides:
//! - [`QueryHandler`] trait implemented by every query handler
//! - Transfer shapes ([`ProductDto`], [`ProductsListDto`], ...) returned to callers
//! - Handlers for single lookups, paginated listings, search, and statistics

pub mod dto;
pub mod handlers;
pub mod query;

pub use dto::{
    InventoryValuationDto, InventoryValueDto, ProductDto, ProductStatsDto, ProductSummaryDto,
    ProductVariantDto, ProductsListDto, VariantSummaryDto,
};
pub use handlers::{
    GetProduct, GetProductHandler, InventoryValuation, ListProducts, ListProductsHandler,
    ProductStats, ProductStatsHandler, SearchCriteria, SearchProductsHandler,
};
pub use query::QueryHandler;
