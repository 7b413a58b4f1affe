//! Notification error types.

use thiserror::Error;

/// Errors that can occur while reacting to an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The email sender reported that a message was not delivered.
    #[error("Failed to deliver email '{subject}' to {recipient}")]
    Delivery { recipient: String, subject: String },

    /// An email body could not be rendered.
    #[error("Failed to render email template {template}: {reason}")]
    Template {
        template: &'static str,
        reason: String,
    },
}
