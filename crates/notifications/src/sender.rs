//! Email sender trait and implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Trait for sending HTML emails.
///
/// Returns true if the message was handed off successfully. Transport
/// failures are reported as false, never as a panic or error.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool;
}

#[async_trait]
impl<T: EmailSender + ?Sized> EmailSender for Arc<T> {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        (**self).send(to, subject, html_body).await
    }
}

/// A sent email, as recorded by [`InMemoryEmailSender`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmailLog {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryEmailState {
    log: Vec<EmailLog>,
    fail_on_send: bool,
}

/// In-memory email sender keeping a log of every delivered message.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmailSender {
    state: Arc<RwLock<InMemoryEmailState>>,
}

impl InMemoryEmailSender {
    /// Creates a new in-memory email sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the sender to report every send as failed.
    pub async fn set_fail_on_send(&self, fail: bool) {
        self.state.write().await.fail_on_send = fail;
    }

    /// Returns every delivered email, oldest first.
    pub async fn sent(&self) -> Vec<EmailLog> {
        self.state.read().await.log.clone()
    }

    /// Returns the number of delivered emails.
    pub async fn sent_count(&self) -> usize {
        self.state.read().await.log.len()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let mut state = self.state.write().await;

        if state.fail_on_send {
            return false;
        }

        state.log.push(EmailLog {
            recipient: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
            sent_at: Utc::now(),
        });
        true
    }
}

/// Sender that writes each message to the trace log instead of a mail
/// transport.
#[derive(Debug, Clone)]
pub struct TracingEmailSender {
    from: String,
}

impl TracingEmailSender {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }
}

#[async_trait]
impl EmailSender for TracingEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        tracing::info!(
            from = %self.from,
            to,
            subject,
            body_len = html_body.len(),
            "email sent"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_is_logged() {
        let sender = InMemoryEmailSender::new();

        assert!(sender.send("ops@example.com", "Hello", "<p>Hi</p>").await);

        let sent = sender.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "ops@example.com");
        assert_eq!(sent[0].subject, "Hello");
        assert_eq!(sent[0].body, "<p>Hi</p>");
    }

    #[tokio::test]
    async fn test_fail_on_send() {
        let sender = InMemoryEmailSender::new();
        sender.set_fail_on_send(true).await;

        assert!(!sender.send("ops@example.com", "Hello", "").await);
        assert_eq!(sender.sent_count().await, 0);

        sender.set_fail_on_send(false).await;
        assert!(sender.send("ops@example.com", "Hello", "").await);
        assert_eq!(sender.sent_count().await, 1);
    }

    #[tokio::test]
    async fn test_tracing_sender_always_succeeds() {
        let sender: Arc<dyn EmailSender> = Arc::new(TracingEmailSender::new("no-reply@example.com"));
        assert!(sender.send("ops@example.com", "Hello", "<p>Hi</p>").await);
    }
}
