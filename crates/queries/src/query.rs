//! Query handler trait.

use async_trait::async_trait;
use domain::DomainError;

/// A handler answering one kind of query.
///
/// Handlers only read: they never save products or publish events.
#[async_trait]
pub trait QueryHandler<Q: Send + 'static>: Send + Sync {
    /// The shape returned to the caller.
    type Output: Send;

    /// Answers the query.
    async fn handle(&self, query: Q) -> Result<Self::Output, DomainError>;
}
