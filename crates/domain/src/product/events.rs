//! Product domain events.

use common::ProductId;
use serde::Serialize;

use crate::event::DomainEvent;

use super::Product;

/// Events emitted by the product catalog after a change has been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    /// A product was created.
    Created { product: Product },

    /// A product was updated; carries the state after the update.
    Updated { product: Product },

    /// A product was deleted. Only the id survives.
    Deleted { product_id: ProductId },

    /// Stock was adjusted by a signed quantity.
    InventoryAdjusted {
        product_id: ProductId,
        quantity_change: i32,
        reason: String,
    },
}

impl ProductEvent {
    /// Returns the id of the product the event is about.
    pub fn product_id(&self) -> &ProductId {
        match self {
            ProductEvent::Created { product } | ProductEvent::Updated { product } => product.id(),
            ProductEvent::Deleted { product_id }
            | ProductEvent::InventoryAdjusted { product_id, .. } => product_id,
        }
    }

    /// Returns the product snapshot carried by the event, if any.
    pub fn product(&self) -> Option<&Product> {
        match self {
            ProductEvent::Created { product } | ProductEvent::Updated { product } => Some(product),
            _ => None,
        }
    }
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Created { .. } => "ProductCreated",
            ProductEvent::Updated { .. } => "ProductUpdated",
            ProductEvent::Deleted { .. } => "ProductDeleted",
            ProductEvent::InventoryAdjusted { .. } => "InventoryAdjusted",
        }
    }
}
