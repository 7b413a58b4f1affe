//! Domain layer for the product catalog.
//!
//! This crate provides:
//! - Value objects (`ProductName`, `ProductPrice`, `ProductStock`)
//! - The `Product` aggregate and its `ProductVariant`s
//! - `ProductEvent`s and the `EventSink` port they are published to
//! - A typed, version-checked `ProductRepository` over a `ProductStore`
//! - Command services (`ProductService`, `InventoryService`)

pub mod error;
pub mod event;
pub mod product;
pub mod repository;

pub use error::DomainError;
pub use event::{DomainEvent, EventSink, InMemoryEventSink, NoopEventSink};
pub use product::{
    AdjustStock, CreateProduct, DeleteProduct, FieldUpdate, IncreaseStock, InventoryService,
    Product, ProductEvent, ProductName, ProductPrice, ProductService, ProductStock, ProductVariant,
    ReduceStock, UpdateProduct, ValidationError, VariantInput,
};
pub use repository::ProductRepository;

pub use catalog_store::{Page, Version};
pub use common::ProductId;
