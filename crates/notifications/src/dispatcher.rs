//! In-process event dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, EventSink, ProductEvent};

use crate::listener::EventListener;

/// Delivers each published event to every registered listener, one after
/// another in registration order, within the publishing call.
///
/// A failing listener is logged and counted; it neither stops the remaining
/// listeners nor surfaces to the publisher. Nothing is retried.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn EventListener>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: Arc<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Registers a listener, builder style.
    pub fn with_listener(mut self, listener: Arc<dyn EventListener>) -> Self {
        self.subscribe(listener);
        self
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl EventSink for EventDispatcher {
    async fn publish(&self, event: ProductEvent) {
        let event_type = event.event_type();
        metrics::counter!("catalog_events_published_total", "event_type" => event_type)
            .increment(1);

        for listener in &self.listeners {
            if let Err(e) = listener.handle(&event).await {
                metrics::counter!(
                    "catalog_listener_failures_total",
                    "listener" => listener.name()
                )
                .increment(1);
                tracing::warn!(
                    listener = listener.name(),
                    event_type,
                    product_id = %event.product_id(),
                    error = %e,
                    "event listener failed"
                );
            }
        }
    }
}
