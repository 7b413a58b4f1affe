//! Query handlers.

mod get_product;
mod list_products;
mod search_products;
mod stats;

pub use get_product::{GetProduct, GetProductHandler};
pub use list_products::{ListProducts, ListProductsHandler};
pub use search_products::{SearchCriteria, SearchProductsHandler};
pub use stats::{InventoryValuation, LOW_STOCK_THRESHOLD, ProductStats, ProductStatsHandler};
