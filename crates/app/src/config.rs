//! Application configuration loaded from environment variables.

use thiserror::Error;

use crate::telemetry::LogFormat;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `CATALOG_STORAGE` names a backend that doesn't exist.
    #[error("Unknown storage backend '{0}' (expected memory, postgres or mongo)")]
    UnknownBackend(String),

    /// A variable required by the selected backend is not set.
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("Invalid value '{value}' for environment variable {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Where products are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process storage, lost on exit.
    Memory,
    /// PostgreSQL via a connection pool.
    Postgres { url: String, max_connections: u32 },
    /// MongoDB, one document per product.
    Mongo {
        url: String,
        database: String,
        collection: String,
    },
}

impl StorageBackend {
    /// Returns the backend name as accepted by `CATALOG_STORAGE`.
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Mongo { .. } => "mongo",
        }
    }
}

/// Who gets told about catalog changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Master switch for every listener.
    pub enabled: bool,
    /// Recipient of notification emails; no emails are sent when unset.
    pub email_to: Option<String>,
    /// Sender address of notification emails.
    pub email_from: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            email_to: None,
            email_from: DEFAULT_EMAIL_FROM.to_string(),
        }
    }
}

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MONGO_DATABASE: &str = "inventory";
const DEFAULT_MONGO_COLLECTION: &str = "products";
const DEFAULT_EMAIL_FROM: &str = "no-reply@localhost";

/// Catalog configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `CATALOG_STORAGE`: `memory`, `postgres` or `mongo` (default: `memory`)
/// - `DATABASE_URL`: PostgreSQL URL (required for `postgres`)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: `5`)
/// - `MONGO_URL`: MongoDB URL (required for `mongo`)
/// - `MONGO_DATABASE`: database name (default: `"inventory"`)
/// - `MONGO_COLLECTION`: collection name (default: `"products"`)
/// - `NOTIFICATIONS_ENABLED`: `true`/`false` (default: `true`)
/// - `NOTIFY_EMAIL_TO`: notification recipient (default: none, no emails)
/// - `NOTIFY_EMAIL_FROM`: notification sender (default: `"no-reply@localhost"`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub notifications: NotificationConfig,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("CATALOG_STORAGE")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("memory") => StorageBackend::Memory,
            Some("postgres") => StorageBackend::Postgres {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    var("DATABASE_MAX_CONNECTIONS"),
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            Some("mongo") => StorageBackend::Mongo {
                url: var("MONGO_URL").ok_or(ConfigError::MissingVar("MONGO_URL"))?,
                database: var("MONGO_DATABASE")
                    .unwrap_or_else(|| DEFAULT_MONGO_DATABASE.to_string()),
                collection: var("MONGO_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_MONGO_COLLECTION.to_string()),
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let notifications = NotificationConfig {
            enabled: parse_or("NOTIFICATIONS_ENABLED", var("NOTIFICATIONS_ENABLED"), true)?,
            email_to: var("NOTIFY_EMAIL_TO"),
            email_from: var("NOTIFY_EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
        };

        let log_format = match var("LOG_FORMAT") {
            None => LogFormat::default(),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "LOG_FORMAT",
                value,
            })?,
        };

        Ok(Self {
            storage,
            notifications,
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Memory,
            notifications: NotificationConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
