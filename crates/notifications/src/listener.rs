//! Event listeners.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, ProductEvent};

use crate::error::NotificationError;
use crate::sender::EmailSender;
use crate::templates::EmailTemplates;

/// A reaction to product events.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Returns the listener name, used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Handles one event. Events the listener does not care about are
    /// accepted and ignored.
    async fn handle(&self, event: &ProductEvent) -> Result<(), NotificationError>;
}

/// Writes one structured log record per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

#[async_trait]
impl EventListener for LoggingListener {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn handle(&self, event: &ProductEvent) -> Result<(), NotificationError> {
        let event_type = event.event_type();
        match event {
            ProductEvent::Created { product } | ProductEvent::Updated { product } => {
                tracing::info!(
                    event_type,
                    product_id = %product.id(),
                    name = %product.name(),
                    price = product.price().value(),
                    stock = product.stock().value(),
                    variants = product.variants().len(),
                    "product event"
                );
            }
            ProductEvent::Deleted { product_id } => {
                tracing::info!(event_type, %product_id, "product event");
            }
            ProductEvent::InventoryAdjusted {
                product_id,
                quantity_change,
                reason,
            } => {
                tracing::info!(
                    event_type,
                    %product_id,
                    quantity_change,
                    reason = %reason,
                    "inventory event"
                );
            }
        }
        Ok(())
    }
}

/// Emails a fixed recipient about created, updated and deleted products.
pub struct EmailNotificationListener {
    sender: Arc<dyn EmailSender>,
    recipient: String,
    templates: EmailTemplates,
}

impl EmailNotificationListener {
    pub fn new(sender: Arc<dyn EmailSender>, recipient: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
            templates: EmailTemplates::new(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

#[async_trait]
impl EventListener for EmailNotificationListener {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn handle(&self, event: &ProductEvent) -> Result<(), NotificationError> {
        let message = match event {
            ProductEvent::Created { product } => self.templates.product_created(product)?,
            ProductEvent::Updated { product } => self.templates.product_updated(product)?,
            ProductEvent::Deleted { product_id } => self.templates.product_deleted(product_id)?,
            ProductEvent::InventoryAdjusted { .. } => return Ok(()),
        };

        if !self
            .sender
            .send(&self.recipient, &message.subject, &message.html_body)
            .await
        {
            return Err(NotificationError::Delivery {
                recipient: self.recipient.clone(),
                subject: message.subject,
            });
        }

        tracing::debug!(
            recipient = %self.recipient,
            subject = %message.subject,
            "notification email sent"
        );
        Ok(())
    }
}
