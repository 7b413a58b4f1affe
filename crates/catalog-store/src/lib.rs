pub mod error;
pub mod memory;
pub mod mongo;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::ProductId;
pub use error::{Result, StoreError};
pub use memory::InMemoryProductStore;
pub use mongo::MongoProductStore;
pub use postgres::PostgresProductStore;
pub use query::{Page, PageRequest, PageRequestError};
pub use record::{ProductRecord, VariantRecord, Version};
pub use store::{ProductStore, ProductStoreExt, SaveOptions};
