//! Types shared by every layer of the product catalog.

mod types;

pub use types::ProductId;
