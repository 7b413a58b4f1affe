//! Domain event traits and the event sink port.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::product::ProductEvent;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + Send + Sync + Clone {
    /// Returns the event type name, used in logs and metric labels.
    fn event_type(&self) -> &'static str;
}

/// Receiver of product events.
///
/// Publishing is fire-and-forget: it runs inline with the triggering command
/// and cannot fail it. Implementations deal with their own failures.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Publishes an event to every interested party.
    async fn publish(&self, event: ProductEvent);
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    async fn publish(&self, event: ProductEvent) {
        (**self).publish(event).await
    }
}

/// Event sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn publish(&self, _event: ProductEvent) {}
}

/// Event sink that records events in publication order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<ProductEvent>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every published event.
    pub async fn events(&self) -> Vec<ProductEvent> {
        self.events.read().await.clone()
    }

    /// Returns the event types in publication order.
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.events
            .read()
            .await
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn publish(&self, event: ProductEvent) {
        self.events.write().await.push(event);
    }
}

#[cfg(test)]
mod tests {
    use common::ProductId;

    use super::*;

    #[tokio::test]
    async fn in_memory_sink_keeps_order() {
        let sink = InMemoryEventSink::new();
        let shared: Arc<dyn EventSink> = Arc::new(sink.clone());

        shared
            .publish(ProductEvent::Deleted {
                product_id: ProductId::new("a"),
            })
            .await;
        shared
            .publish(ProductEvent::InventoryAdjusted {
                product_id: ProductId::new("b"),
                quantity_change: 3,
                reason: "restock".to_string(),
            })
            .await;

        assert_eq!(
            sink.event_types().await,
            vec!["ProductDeleted", "InventoryAdjusted"]
        );
        sink.clear().await;
        assert!(sink.is_empty().await);
    }
}
