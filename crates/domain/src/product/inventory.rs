//! Signed stock adjustments.

use std::sync::Arc;

use catalog_store::ProductStore;

use crate::error::DomainError;

use super::{AdjustStock, IncreaseStock, Product, ProductEvent, ProductService, ReduceStock};

/// Turns signed stock adjustments into increases or reductions and announces
/// each one with an `InventoryAdjusted` event.
pub struct InventoryService<S: ProductStore> {
    products: Arc<ProductService<S>>,
}

impl<S: ProductStore> InventoryService<S> {
    pub fn new(products: Arc<ProductService<S>>) -> Self {
        Self { products }
    }

    /// Adjusts stock by `cmd.quantity`: positive adds, negative removes the
    /// magnitude, zero leaves the stock as is.
    ///
    /// The event is published only once the adjustment has been persisted.
    #[tracing::instrument(skip(self))]
    pub async fn adjust_stock(&self, cmd: AdjustStock) -> Result<Product, DomainError> {
        let product_id = cmd.product_id.clone();
        let magnitude = cmd.quantity.unsigned_abs();

        let product = match cmd.quantity.signum() {
            1 => {
                self.products
                    .increase_stock(IncreaseStock::new(product_id.clone(), magnitude))
                    .await?
            }
            -1 => {
                self.products
                    .reduce_stock(ReduceStock::new(product_id.clone(), magnitude))
                    .await?
            }
            _ => self.products.get_product(&product_id).await?,
        };

        self.products
            .events()
            .publish(ProductEvent::InventoryAdjusted {
                product_id,
                quantity_change: cmd.quantity,
                reason: cmd.reason,
            })
            .await;
        Ok(product)
    }
}
