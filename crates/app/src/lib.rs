//! Wiring for the product catalog.
//!
//! Loads [`Config`], installs logging and metrics, opens the configured
//! storage backend and assembles the command services, query handlers and
//! event listeners behind a single [`Catalog`] handle.

pub mod config;
pub mod error;
pub mod telemetry;

use std::sync::Arc;

use catalog_store::{
    InMemoryProductStore, MongoProductStore, PostgresProductStore, ProductStore, StoreError,
};
use common::ProductId;
use domain::{
    AdjustStock, CreateProduct, DeleteProduct, DomainError, IncreaseStock, InventoryService,
    Product, ProductService, ReduceStock, UpdateProduct,
};
use metrics_exporter_prometheus::PrometheusHandle;
use notifications::{
    EmailNotificationListener, EmailSender, EventDispatcher, LoggingListener, TracingEmailSender,
};
use queries::{
    GetProduct, GetProductHandler, InventoryValuation, InventoryValuationDto, ListProducts,
    ListProductsHandler, ProductDto, ProductStats, ProductStatsDto, ProductStatsHandler,
    ProductSummaryDto, ProductsListDto, QueryHandler, SearchCriteria, SearchProductsHandler,
};
use sqlx::postgres::PgPoolOptions;

pub use config::{Config, ConfigError, NotificationConfig, StorageBackend};
pub use error::AppError;
pub use telemetry::LogFormat;

/// Store shared by every service and handler of a [`Catalog`].
pub type SharedStore = Arc<dyn ProductStore>;

/// Installs tracing and the Prometheus recorder as configured.
pub fn init_telemetry(config: &Config) -> Result<PrometheusHandle, AppError> {
    telemetry::init_tracing(&config.log_level, config.log_format)?;
    telemetry::init_metrics()
}

/// Opens the configured storage backend, applying migrations where needed.
pub async fn open_store(backend: &StorageBackend) -> Result<SharedStore, StoreError> {
    let store: SharedStore = match backend {
        StorageBackend::Memory => Arc::new(InMemoryProductStore::new()),
        StorageBackend::Postgres {
            url,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(url)
                .await?;
            let store = PostgresProductStore::new(pool);
            store.run_migrations().await?;
            Arc::new(store)
        }
        StorageBackend::Mongo {
            url,
            database,
            collection,
        } => Arc::new(MongoProductStore::connect(url, database, collection).await?),
    };
    tracing::info!(backend = backend.name(), "product store ready");
    Ok(store)
}

/// Builds the dispatcher with the listeners enabled by `config`.
///
/// The logging listener is always registered first when notifications are
/// enabled; the email listener follows when a recipient is configured.
pub fn build_dispatcher(
    sender: Arc<dyn EmailSender>,
    config: &NotificationConfig,
) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    if !config.enabled {
        return dispatcher;
    }

    dispatcher.subscribe(Arc::new(LoggingListener));
    if let Some(recipient) = &config.email_to {
        dispatcher.subscribe(Arc::new(EmailNotificationListener::new(
            sender,
            recipient.clone(),
        )));
    }
    dispatcher
}

/// The assembled product catalog.
pub struct Catalog {
    products: Arc<ProductService<SharedStore>>,
    inventory: InventoryService<SharedStore>,
    get_product: GetProductHandler<SharedStore>,
    list_products: ListProductsHandler<SharedStore>,
    search_products: SearchProductsHandler<SharedStore>,
    stats: ProductStatsHandler<SharedStore>,
}

impl Catalog {
    /// Assembles a catalog over `store`, sending notification emails through
    /// `sender`.
    pub fn new(
        store: SharedStore,
        sender: Arc<dyn EmailSender>,
        notifications: &NotificationConfig,
    ) -> Self {
        let dispatcher = build_dispatcher(sender, notifications);
        tracing::debug!(listeners = dispatcher.listener_count(), "event dispatcher ready");

        let products = Arc::new(ProductService::new(store.clone(), Arc::new(dispatcher)));
        Self {
            inventory: InventoryService::new(products.clone()),
            products,
            get_product: GetProductHandler::new(store.clone()),
            list_products: ListProductsHandler::new(store.clone()),
            search_products: SearchProductsHandler::new(store.clone()),
            stats: ProductStatsHandler::new(store),
        }
    }

    /// Opens the configured backend and assembles a catalog over it.
    /// Notification emails are written to the log.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let store = open_store(&config.storage).await?;
        let sender = Arc::new(TracingEmailSender::new(
            config.notifications.email_from.clone(),
        ));
        Ok(Self::new(store, sender, &config.notifications))
    }

    /// Assembles a catalog over an empty in-memory store.
    pub fn in_memory(sender: Arc<dyn EmailSender>, notifications: &NotificationConfig) -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), sender, notifications)
    }

    // Commands

    pub async fn create_product(&self, cmd: CreateProduct) -> Result<Product, DomainError> {
        self.products.create_product(cmd).await
    }

    pub async fn update_product(&self, cmd: UpdateProduct) -> Result<Product, DomainError> {
        self.products.update_product(cmd).await
    }

    pub async fn delete_product(&self, cmd: DeleteProduct) -> Result<(), DomainError> {
        self.products.delete_product(cmd).await
    }

    pub async fn reduce_stock(&self, cmd: ReduceStock) -> Result<Product, DomainError> {
        self.products.reduce_stock(cmd).await
    }

    pub async fn increase_stock(&self, cmd: IncreaseStock) -> Result<Product, DomainError> {
        self.products.increase_stock(cmd).await
    }

    pub async fn adjust_stock(&self, cmd: AdjustStock) -> Result<Product, DomainError> {
        self.inventory.adjust_stock(cmd).await
    }

    // Queries

    /// Fetches one product in its transfer shape.
    pub async fn get_product(
        &self,
        product_id: impl Into<ProductId>,
    ) -> Result<ProductDto, DomainError> {
        self.get_product.handle(GetProduct::new(product_id)).await
    }

    pub async fn list_products(&self, query: ListProducts) -> Result<ProductsListDto, DomainError> {
        self.list_products.handle(query).await
    }

    pub async fn search_products(
        &self,
        criteria: SearchCriteria,
    ) -> Result<Vec<ProductSummaryDto>, DomainError> {
        self.search_products.handle(criteria).await
    }

    pub async fn stats(&self) -> Result<ProductStatsDto, DomainError> {
        self.stats.handle(ProductStats).await
    }

    pub async fn inventory_valuation(&self) -> Result<InventoryValuationDto, DomainError> {
        self.stats.handle(InventoryValuation).await
    }

    /// Returns the underlying product service.
    pub fn products(&self) -> &ProductService<SharedStore> {
        &self.products
    }
}
