//! Reactions to product catalog events.
//!
//! This crate provides:
//! - [`EventDispatcher`], an [`domain::EventSink`] fanning events out to listeners in order
//! - [`EventListener`] implementations: [`LoggingListener`] and [`EmailNotificationListener`]
//! - The [`EmailSender`] port with an in-memory (email log) and a tracing-backed sender
//! - HTML email templates rendered with Handlebars

pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod sender;
pub mod templates;

pub use dispatcher::EventDispatcher;
pub use error::NotificationError;
pub use listener::{EmailNotificationListener, EventListener, LoggingListener};
pub use sender::{EmailLog, EmailSender, InMemoryEmailSender, TracingEmailSender};
pub use templates::{EmailMessage, EmailTemplates};
